//! # callbind-primitives
//!
//! Value types shared by the callbind codec and contract bindings.
//!
//! - [`Address`] and [`H256`]: fixed-width byte values
//! - [`U256`] and [`I256`]: the 256-bit integer containers used as the
//!   canonical big-integer representation
//! - [`Uint128`] and [`Int128`]: 128-bit wrappers that map to the ABI types
//!   `uint128`/`int128` rather than to their storage width
//! - [`Eth`] and [`ChainId`]: domain values carried on the wire as `uint256`
//! - [`MessageIdentifier`]: a log identifier carried as a tuple

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod identifier;
mod int;
mod units;

pub use address::{Address, AddressError};
pub use error::OverflowError;
pub use hash::{HashError, H256};
pub use identifier::MessageIdentifier;
pub use int::{Int128, Uint128, I256};
pub use units::{ChainId, Eth};

// Re-export primitive-types for U256
pub use primitive_types::U256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u256_word_layout() {
        let mut word = [0u8; 32];
        U256::from(0x0539u64).to_big_endian(&mut word);
        assert_eq!(word[30], 0x05);
        assert_eq!(word[31], 0x39);
        assert!(word[..30].iter().all(|b| *b == 0));
    }
}
