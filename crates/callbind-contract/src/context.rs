//! Shared binding context

use std::fmt;
use std::sync::Arc;

use callbind_abi::CodecConfig;
use callbind_primitives::Address;

use crate::backend::Backend;
use crate::error::CallError;

/// Target contract, backend and codec settings shared by a binding and every
/// call it produces
#[derive(Clone)]
pub struct BindingContext {
    /// Contract address
    pub target: Address,
    /// Codec settings
    pub config: CodecConfig,
    backend: Option<Arc<dyn Backend>>,
}

impl BindingContext {
    /// Context for `target` with no backend; calls can still be encoded
    /// and their return data decoded
    pub fn new(target: Address) -> Self {
        Self {
            target,
            config: CodecConfig::default(),
            backend: None,
        }
    }

    /// Use `backend` to evaluate calls
    pub fn with_backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Use `config` for decoding
    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// The backend, if one is configured
    pub fn backend(&self) -> Result<&Arc<dyn Backend>, CallError> {
        self.backend.as_ref().ok_or(CallError::NoBackend)
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingContext")
            .field("target", &self.target)
            .field("config", &self.config)
            .field("backend", &self.backend.is_some())
            .finish()
    }
}
