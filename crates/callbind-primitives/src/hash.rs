//! 32-byte values (`bytes32` on the wire)

use std::fmt;
use thiserror::Error;

/// Hash parsing error
#[derive(Debug, Error)]
pub enum HashError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },
}

/// 256-bit opaque value, e.g. a hash, root claim or game metadata word
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct H256([u8; 32]);

impl H256 {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Zero value
    pub const ZERO: H256 = H256([0u8; 32]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, HashError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| HashError::InvalidLength {
            expected: Self::LEN,
            got: slice.len(),
        })?;
        Ok(H256(bytes))
    }

    /// Parse from hex string
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| HashError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self.to_hex())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

impl From<H256> for [u8; 32] {
    fn from(value: H256) -> Self {
        value.0
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for H256 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for H256 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            H256::from_hex(&s).map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h256_from_hex() {
        let h = H256::from_hex("0xc0ced67668cc6e8e63517245aa7e34053a1332eb4303f3169b6051810e277036")
            .unwrap();
        assert_eq!(h.as_bytes()[0], 0xc0);
        assert_eq!(h.as_bytes()[31], 0x36);
    }

    #[test]
    fn test_h256_wrong_length() {
        let err = H256::from_slice(&[0u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            HashError::InvalidLength {
                expected: 32,
                got: 31
            }
        ));
    }

    #[test]
    fn test_h256_zero() {
        assert!(H256::ZERO.is_zero());
        assert!(H256::default().is_zero());
    }
}
