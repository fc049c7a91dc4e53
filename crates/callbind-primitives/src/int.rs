//! Signed 256-bit integers and the 128-bit wrapper types

use std::fmt;

use primitive_types::U256;

use crate::OverflowError;

/// Signed 256-bit integer.
///
/// Stored as sign and magnitude; converted to two's complement only at the
/// word boundary. The magnitude is always within `int256` range and zero is
/// never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

/// `(!v) + 1` modulo 2^256
fn negate(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256([0; 4]),
        negative: false,
    };

    /// Create from magnitude and sign. Returns `None` outside `int256` range.
    pub fn from_parts(abs: U256, negative: bool) -> Option<Self> {
        let value = Self {
            abs,
            negative: negative && !abs.is_zero(),
        };
        value.fits_bits(256).then_some(value)
    }

    /// Non-negative value from an unsigned magnitude
    pub fn from_unsigned(abs: U256) -> Option<Self> {
        Self::from_parts(abs, false)
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self {
            abs: U256::from(value.unsigned_abs()),
            negative: value < 0,
        }
    }

    /// Absolute value
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Whether the value is below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Whether the value is representable as a signed integer of `bits` width
    pub fn fits_bits(&self, bits: usize) -> bool {
        if bits == 0 || bits > 256 {
            return false;
        }
        let limit = U256::one() << (bits - 1);
        if self.negative {
            self.abs <= limit
        } else {
            self.abs < limit
        }
    }

    /// Convert to i128 if in range
    pub fn to_i128(&self) -> Option<i128> {
        if !self.fits_bits(128) {
            return None;
        }
        let magnitude = self.abs.low_u128();
        if self.negative {
            Some(0i128.wrapping_sub_unsigned(magnitude))
        } else {
            Some(magnitude as i128)
        }
    }

    /// Convert to a non-negative magnitude, if the value is not negative
    pub fn to_unsigned(&self) -> Option<U256> {
        (!self.negative).then_some(self.abs)
    }

    /// Decode a big-endian two's complement word
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let raw = U256::from_big_endian(&bytes);
        if bytes[0] & 0x80 != 0 {
            Self {
                abs: negate(raw),
                negative: true,
            }
        } else {
            Self {
                abs: raw,
                negative: false,
            }
        }
    }

    /// Encode as a big-endian two's complement word
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let raw = if self.negative {
            negate(self.abs)
        } else {
            self.abs
        };
        let mut bytes = [0u8; 32];
        raw.to_big_endian(&mut bytes);
        bytes
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// Unsigned 128-bit value that encodes as ABI `uint128`.
///
/// The ABI type is fixed by the wrapper, not inferred from the width of the
/// value it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Uint128(pub u128);

impl Uint128 {
    /// Create a new value
    pub const fn new(value: u128) -> Self {
        Uint128(value)
    }

    /// Inner value
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Widen to the canonical big-integer representation
    pub fn to_big(&self) -> U256 {
        U256::from(self.0)
    }

    /// Narrow from a big integer
    pub fn try_from_big(value: U256) -> Result<Self, OverflowError> {
        if value.bits() > 128 {
            return Err(OverflowError::new("uint128", value));
        }
        Ok(Uint128(value.low_u128()))
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Uint128(value)
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed 128-bit value that encodes as ABI `int128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Int128(pub i128);

impl Int128 {
    /// Create a new value
    pub const fn new(value: i128) -> Self {
        Int128(value)
    }

    /// Inner value
    pub const fn get(&self) -> i128 {
        self.0
    }

    /// Widen to the canonical big-integer representation
    pub fn to_big(&self) -> I256 {
        I256::from_i128(self.0)
    }

    /// Narrow from a big integer
    pub fn try_from_big(value: I256) -> Result<Self, OverflowError> {
        value
            .to_i128()
            .map(Int128)
            .ok_or_else(|| OverflowError::new("int128", value))
    }
}

impl From<i128> for Int128 {
    fn from(value: i128) -> Self {
        Int128(value)
    }
}

impl fmt::Display for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
