//! ABI type definitions

use std::fmt;

use callbind_primitives::{Address, I256, U256};

/// Solidity ABI token types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Address (20 bytes)
    Address(Address),
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic array
    Array(Vec<Token>),
    /// Fixed-size array
    FixedArray(Vec<Token>),
    /// Tuple (struct)
    Tuple(Vec<Token>),
}

impl Token {
    /// Short name of the token kind, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::Bytes(_) => "bytes",
            Token::FixedBytes(_) => "fixed bytes",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
            Token::Tuple(_) => "tuple",
        }
    }

    /// Whether this token can be encoded as `kind`
    pub fn type_check(&self, kind: &ParamType) -> bool {
        match (self, kind) {
            (Token::Address(_), ParamType::Address)
            | (Token::Bool(_), ParamType::Bool)
            | (Token::Bytes(_), ParamType::Bytes)
            | (Token::String(_), ParamType::String) => true,
            (Token::Uint(v), ParamType::Uint(bits)) => v.bits() <= *bits,
            (Token::Int(v), ParamType::Int(bits)) => v.fits_bits(*bits),
            (Token::FixedBytes(b), ParamType::FixedBytes(size)) => b.len() == *size,
            (Token::Array(tokens), ParamType::Array(inner)) => {
                tokens.iter().all(|t| t.type_check(inner))
            }
            (Token::FixedArray(tokens), ParamType::FixedArray(inner, size)) => {
                tokens.len() == *size && tokens.iter().all(|t| t.type_check(inner))
            }
            (Token::Tuple(tokens), ParamType::Tuple(fields)) => {
                tokens.len() == fields.len()
                    && tokens.iter().zip(fields).all(|(t, f)| t.type_check(&f.kind))
            }
            _ => false,
        }
    }
}

/// A named tuple component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleField {
    /// Component name, empty for positional components
    pub name: String,
    /// Component type
    pub kind: ParamType,
}

impl TupleField {
    /// Create a named component
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create an unnamed component
    pub fn unnamed(kind: ParamType) -> Self {
        Self::new(String::new(), kind)
    }
}

/// Solidity parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Address
    Address,
    /// Unsigned integer with bit size (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit size
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes (size 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic array
    Array(Box<ParamType>),
    /// Fixed-size array
    FixedArray(Box<ParamType>, usize),
    /// Tuple with named components
    Tuple(Vec<TupleField>),
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(|f| f.kind.is_dynamic()),
            _ => false,
        }
    }

    /// Bytes this type occupies in the head of its enclosing block
    pub fn head_length(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, size) if !self.is_dynamic() => {
                inner.head_length() * size
            }
            ParamType::Tuple(fields) if !self.is_dynamic() => {
                fields.iter().map(|f| f.kind.head_length()).sum()
            }
            _ => 32,
        }
    }

    /// Canonical type string used in function signatures.
    ///
    /// Tuples are spelled out as `(t1,t2,...)`.
    pub fn canonical(&self) -> String {
        match self {
            ParamType::Address => "address".to_string(),
            ParamType::Uint(bits) => format!("uint{bits}"),
            ParamType::Int(bits) => format!("int{bits}"),
            ParamType::Bool => "bool".to_string(),
            ParamType::Bytes => "bytes".to_string(),
            ParamType::FixedBytes(size) => format!("bytes{size}"),
            ParamType::String => "string".to_string(),
            ParamType::Array(inner) => format!("{}[]", inner.canonical()),
            ParamType::FixedArray(inner, size) => format!("{}[{size}]", inner.canonical()),
            ParamType::Tuple(fields) => {
                let parts: Vec<String> = fields.iter().map(|f| f.kind.canonical()).collect();
                format!("({})", parts.join(","))
            }
        }
    }

    /// Type string as written in JSON ABI descriptions, where tuples are
    /// `tuple` and their components are listed separately.
    pub fn type_name(&self) -> String {
        match self {
            ParamType::Tuple(_) => "tuple".to_string(),
            ParamType::Array(inner) => format!("{}[]", inner.type_name()),
            ParamType::FixedArray(inner, size) => format!("{}[{size}]", inner.type_name()),
            other => other.canonical(),
        }
    }

    /// Components of the tuple at the core of this type, looking through
    /// array layers
    pub fn components(&self) -> Option<&[TupleField]> {
        match self {
            ParamType::Tuple(fields) => Some(fields),
            ParamType::Array(inner) | ParamType::FixedArray(inner, _) => inner.components(),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
