//! Native type descriptors and dynamic values
//!
//! [`NativeType`] describes the shape of a Rust type as the codec sees it.
//! [`Value`] is the matching runtime value. Typed code produces both through
//! [`AbiValue`](crate::AbiValue); the runtime binding path builds them by
//! hand.

use std::fmt;

use callbind_primitives::{ChainId, Eth, Int128, MessageIdentifier, Uint128, I256, U256};

use crate::value::AbiValue;

/// Domain wrapper types with a fixed ABI representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomKind {
    /// [`Uint128`], carried as `uint128`
    Uint128,
    /// [`Int128`], carried as `int128`
    Int128,
    /// [`Eth`], carried as `uint256`
    Eth,
    /// [`ChainId`], carried as `uint256`
    ChainId,
    /// [`MessageIdentifier`], carried as a five-member tuple
    MessageIdentifier,
}

impl CustomKind {
    /// Rust type name
    pub fn name(&self) -> &'static str {
        match self {
            CustomKind::Uint128 => "Uint128",
            CustomKind::Int128 => "Int128",
            CustomKind::Eth => "Eth",
            CustomKind::ChainId => "ChainId",
            CustomKind::MessageIdentifier => "MessageIdentifier",
        }
    }
}

/// A struct field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldType {
    /// Rust field name
    pub name: String,
    /// Whether the field is `pub`
    pub exported: bool,
    /// Field type
    pub ty: NativeType,
}

impl FieldType {
    /// Exported field
    pub fn new(name: impl Into<String>, ty: NativeType) -> Self {
        Self {
            name: name.into(),
            exported: true,
            ty,
        }
    }
}

/// A struct type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    /// Rust type name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldType>,
}

/// Shape of a native type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// `bool`
    Bool,
    /// `String`
    String,
    /// Unsigned integer; `None` for machine width
    Uint(Option<usize>),
    /// Signed integer; `None` for machine width
    Int(Option<usize>),
    /// Arbitrary-precision unsigned integer
    BigUint,
    /// Arbitrary-precision signed integer
    BigInt,
    /// Fixed-length byte array; `address` marks the 20-byte address type
    ByteArray {
        /// Length in bytes
        len: usize,
        /// Whether this is an address
        address: bool,
    },
    /// Fixed-length array of a non-byte element
    Array(Box<NativeType>, usize),
    /// Variable-length byte sequence
    ByteSlice,
    /// Variable-length sequence of a non-byte element
    Slice(Box<NativeType>),
    /// Struct
    Struct(StructType),
    /// Optional reference to a value
    Pointer(Box<NativeType>),
    /// Domain wrapper type
    Custom(CustomKind),
    /// Anything else (maps, functions, channels)
    Unsupported(String),
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Bool => f.write_str("bool"),
            NativeType::String => f.write_str("String"),
            NativeType::Uint(Some(bits)) => write!(f, "u{bits}"),
            NativeType::Uint(None) => f.write_str("usize"),
            NativeType::Int(Some(bits)) => write!(f, "i{bits}"),
            NativeType::Int(None) => f.write_str("isize"),
            NativeType::BigUint => f.write_str("U256"),
            NativeType::BigInt => f.write_str("I256"),
            NativeType::ByteArray { address: true, .. } => f.write_str("Address"),
            NativeType::ByteArray { len, .. } => write!(f, "[u8; {len}]"),
            NativeType::Array(inner, len) => write!(f, "[{inner}; {len}]"),
            NativeType::ByteSlice => f.write_str("Vec<u8>"),
            NativeType::Slice(inner) => write!(f, "Vec<{inner}>"),
            NativeType::Struct(st) => f.write_str(&st.name),
            NativeType::Pointer(inner) => write!(f, "Option<{inner}>"),
            NativeType::Custom(kind) => f.write_str(kind.name()),
            NativeType::Unsupported(name) => f.write_str(name),
        }
    }
}

/// Domain wrapper values, before substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomValue {
    /// `uint128`
    Uint128(Uint128),
    /// `int128`
    Int128(Int128),
    /// Amount in wei
    Eth(Eth),
    /// Chain id
    ChainId(ChainId),
    /// Cross-chain log identifier
    MessageIdentifier(MessageIdentifier),
}

/// A runtime value shaped by some [`NativeType`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// String
    String(String),
    /// Unsigned integer, any width
    Uint(U256),
    /// Signed integer, any width
    Int(I256),
    /// Fixed byte array or byte slice
    Bytes(Vec<u8>),
    /// Fixed-length array elements
    Array(Vec<Value>),
    /// Variable-length sequence elements
    Slice(Vec<Value>),
    /// Struct fields in declaration order, by Rust name
    Struct(Vec<(String, Value)>),
    /// Optional reference
    Pointer(Option<Box<Value>>),
    /// Domain wrapper
    Custom(CustomValue),
}

impl Value {
    /// Short name of the value kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Uint(_) => "unsigned integer",
            Value::Int(_) => "signed integer",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Slice(_) => "slice",
            Value::Struct(_) => "struct",
            Value::Pointer(_) => "pointer",
            Value::Custom(_) => "custom value",
        }
    }
}

/// A call argument: a value together with its declared type
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Declared type
    pub ty: NativeType,
    /// Value
    pub value: Value,
}

impl Argument {
    /// Argument with an explicit type
    pub fn new(ty: NativeType, value: Value) -> Self {
        Self { ty, value }
    }

    /// Argument from a typed value
    pub fn of<T: AbiValue>(value: &T) -> Self {
        Self {
            ty: T::native_type(),
            value: value.to_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_type_display() {
        assert_eq!(NativeType::Uint(Some(64)).to_string(), "u64");
        assert_eq!(NativeType::Int(None).to_string(), "isize");
        assert_eq!(
            NativeType::Slice(Box::new(NativeType::Custom(CustomKind::Uint128))).to_string(),
            "Vec<Uint128>"
        );
        assert_eq!(
            NativeType::ByteArray {
                len: 40,
                address: false
            }
            .to_string(),
            "[u8; 40]"
        );
    }

    #[test]
    fn test_argument_of() {
        let arg = Argument::of(&Uint128(1337));
        assert_eq!(arg.ty, NativeType::Custom(CustomKind::Uint128));
        assert_eq!(arg.value, Value::Custom(CustomValue::Uint128(Uint128(1337))));
    }
}
