//! Domain values carried as `uint256`

use std::fmt;

use primitive_types::U256;

const WEI_PER_GWEI: u64 = 1_000_000_000;
const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// An amount of ether, in wei.
///
/// Methods return new values instead of mutating in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Eth(U256);

impl Eth {
    /// Zero wei
    pub const ZERO: Eth = Eth(U256([0; 4]));

    /// Largest representable amount
    pub const MAX: Eth = Eth(U256([u64::MAX; 4]));

    /// Amount from a wei count
    pub fn wei(wei: u128) -> Self {
        Eth(U256::from(wei))
    }

    /// Amount from a gwei count
    pub fn gwei(gwei: u64) -> Self {
        Eth(U256::from(gwei) * U256::from(WEI_PER_GWEI))
    }

    /// Amount from a whole number of ether
    pub fn ether(ether: u64) -> Self {
        Eth(U256::from(ether) * U256::from(WEI_PER_ETHER))
    }

    /// Amount from a 256-bit wei value
    pub const fn from_big(wei: U256) -> Self {
        Eth(wei)
    }

    /// The amount in wei, as a big integer
    pub fn to_big(&self) -> U256 {
        self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition
    pub fn checked_add(&self, other: Eth) -> Option<Eth> {
        self.0.checked_add(other.0).map(Eth)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: Eth) -> Option<Eth> {
        self.0.checked_sub(other.0).map(Eth)
    }
}

impl From<U256> for Eth {
    fn from(wei: U256) -> Self {
        Eth(wei)
    }
}

impl From<Eth> for U256 {
    fn from(value: Eth) -> Self {
        value.0
    }
}

/// Insert `,` every three digits of a decimal string
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Eth {
    /// Prints in ether if the amount is whole ether, in gwei if it is whole
    /// gwei, otherwise in wei. No precision is dropped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return write!(f, "0 wei");
        }
        let (ether, rem) = self.0.div_mod(U256::from(WEI_PER_ETHER));
        if rem.is_zero() {
            return write!(f, "{} ether", group_thousands(&ether.to_string()));
        }
        let (gwei, rem) = self.0.div_mod(U256::from(WEI_PER_GWEI));
        if rem.is_zero() {
            return write!(f, "{} gwei", group_thousands(&gwei.to_string()));
        }
        write!(f, "{} wei", group_thousands(&self.0.to_string()))
    }
}

impl fmt::Debug for Eth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Eth({})", self)
    }
}

/// Chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChainId(U256);

impl ChainId {
    /// Create from a small chain id
    pub fn new(id: u64) -> Self {
        ChainId(U256::from(id))
    }

    /// Create from a 256-bit value
    pub const fn from_big(id: U256) -> Self {
        ChainId(id)
    }

    /// The id as a big integer
    pub fn to_big(&self) -> U256 {
        self.0
    }

    /// The id as u64, if it fits
    pub fn as_u64(&self) -> Option<u64> {
        (self.0.bits() <= 64).then(|| self.0.low_u64())
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        ChainId::new(id)
    }
}

impl From<U256> for ChainId {
    fn from(id: U256) -> Self {
        ChainId(id)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
