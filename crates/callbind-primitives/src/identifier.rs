//! Cross-chain message identifier

use crate::{Address, ChainId};

/// Identifies a log emitted on some chain, as consumed by cross-chain
/// message contracts.
///
/// On the wire every numeric field is widened to `uint256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MessageIdentifier {
    /// Emitting contract
    pub origin: Address,
    /// Block containing the log
    pub block_number: u64,
    /// Position of the log within the block
    pub log_index: u32,
    /// Timestamp of the block
    pub timestamp: u64,
    /// Chain the log was emitted on
    pub chain_id: ChainId,
}
