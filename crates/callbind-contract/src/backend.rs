//! I/O collaborator used to evaluate calls

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use callbind_abi::keccak256;
use callbind_primitives::{Address, Eth, H256};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Transaction options for state-changing calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOptions {
    /// Value sent with the call
    #[serde(default)]
    pub value: Eth,
    /// Gas limit, estimated by the backend when absent
    #[serde(default)]
    pub gas_limit: Option<u64>,
    /// Sender nonce, looked up by the backend when absent
    #[serde(default)]
    pub nonce: Option<u64>,
}

/// Outcome of a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Transaction hash
    pub tx_hash: H256,
    /// Whether execution succeeded
    pub status: bool,
    /// Gas used
    pub gas_used: u64,
}

/// Executes read-only calls and submits transactions (object-safe)
#[async_trait]
pub trait Backend: Send + Sync {
    /// Execute a read-only call and return the raw result bytes
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, BackendError>;

    /// Submit a transaction and wait for its receipt
    async fn send(
        &self,
        to: Address,
        data: Bytes,
        opts: &TxOptions,
    ) -> Result<Receipt, BackendError>;
}

/// A call or transaction seen by [`MockBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Target address
    pub to: Address,
    /// Call data
    pub data: Bytes,
    /// Options, `None` for read-only calls
    pub opts: Option<TxOptions>,
}

const TX_BASE_GAS: u64 = 21_000;
const ZERO_BYTE_GAS: u64 = 4;
const NONZERO_BYTE_GAS: u64 = 16;

/// Mock backend for testing.
///
/// Answers read-only calls with canned return data keyed by selector and
/// records everything it is given.
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<HashMap<[u8; 4], Bytes>>,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    /// Create a new mock backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the return data for calls with the given selector
    pub fn set_response(&self, selector: [u8; 4], data: impl Into<Bytes>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(selector, data.into());
        }
    }

    /// Everything submitted so far, oldest first
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    /// Clear responses and recorded calls
    pub fn clear(&self) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.clear();
        }
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.clear();
        }
    }

    fn record(&self, call: RecordedCall) -> Result<(), BackendError> {
        self.recorded
            .lock()
            .map_err(|_| BackendError::Transport("MockBackend mutex poisoned".to_string()))?
            .push(call);
        Ok(())
    }
}

/// Intrinsic gas of a transaction carrying `data`
fn intrinsic_gas(data: &[u8]) -> u64 {
    data.iter().fold(TX_BASE_GAS, |gas, b| {
        gas + if *b == 0 { ZERO_BYTE_GAS } else { NONZERO_BYTE_GAS }
    })
}

#[async_trait]
impl Backend for MockBackend {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, BackendError> {
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| BackendError::Reverted("call data shorter than a selector".into()))?;
        self.record(RecordedCall {
            to,
            data,
            opts: None,
        })?;

        self.responses
            .lock()
            .map_err(|_| BackendError::Transport("MockBackend mutex poisoned".to_string()))?
            .get(&selector)
            .cloned()
            .ok_or_else(|| BackendError::NoResponse(hex::encode(selector)))
    }

    async fn send(
        &self,
        to: Address,
        data: Bytes,
        opts: &TxOptions,
    ) -> Result<Receipt, BackendError> {
        let gas_used = intrinsic_gas(&data);
        let status = opts.gas_limit.map_or(true, |limit| gas_used <= limit);
        let tx_hash = keccak256(&data);
        self.record(RecordedCall {
            to,
            data,
            opts: Some(opts.clone()),
        })?;
        Ok(Receipt {
            tx_hash,
            status,
            gas_used,
        })
    }
}
