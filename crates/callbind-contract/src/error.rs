//! Binding error types

use callbind_abi::{DecodeError, EncodeError, TypeError};
use thiserror::Error;

/// Failure to bind a method table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A declared input or output type has no ABI counterpart
    #[error("method {method}: {source}")]
    Type {
        /// Method name
        method: String,
        /// Mapping failure
        #[source]
        source: TypeError,
    },

    /// Two methods registered under one name
    #[error("duplicate method: {0}")]
    DuplicateMethod(String),
}

/// Error reported by a backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call reverted
    #[error("execution reverted: {0}")]
    Reverted(String),

    /// No canned response for a selector
    #[error("no response for selector 0x{0}")]
    NoResponse(String),
}

/// Failure of a single call
#[derive(Debug, Error)]
pub enum CallError {
    /// Arguments could not be encoded
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Return data could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The backend failed
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// The binding context has no backend to evaluate the call with
    #[error("no backend configured")]
    NoBackend,

    /// Method not present in the bound table
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}
