//! Conversion errors

use thiserror::Error;

/// A big integer did not fit into a fixed-width target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value {value} overflows {target}")]
pub struct OverflowError {
    /// Name of the target type (e.g. `uint128`, `Eth`)
    pub target: &'static str,
    /// Decimal rendering of the rejected value
    pub value: String,
}

impl OverflowError {
    /// Create an overflow error for `target`
    pub fn new(target: &'static str, value: impl ToString) -> Self {
        Self {
            target,
            value: value.to_string(),
        }
    }
}
