//! Codec configuration

use serde::{Deserialize, Serialize};

/// What to do when a decoded value does not fit a domain wrapper type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Fail the decode with an overflow error
    #[default]
    Error,
    /// Substitute zero. Kept for callers that relied on silent truncation.
    Zero,
}

/// Codec settings carried by a binding context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Overflow handling for domain wrapper types
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

impl CodecConfig {
    /// Config with the legacy zero-on-overflow behavior
    pub fn legacy() -> Self {
        Self {
            overflow: OverflowPolicy::Zero,
        }
    }
}
