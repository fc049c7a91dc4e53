//! Function signatures and selectors

use callbind_primitives::H256;
use sha3::{Digest, Keccak256};

use crate::types::ParamType;

/// Compute Keccak-256 hash
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_bytes(hasher.finalize().into())
}

/// Canonical signature `name(t1,t2,...)`
pub fn function_signature(name: &str, inputs: &[ParamType]) -> String {
    let types: Vec<String> = inputs.iter().map(ParamType::canonical).collect();
    format!("{}({})", name, types.join(","))
}

/// Compute function selector (first 4 bytes of keccak256(signature))
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}
