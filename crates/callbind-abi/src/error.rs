//! Error types

use callbind_primitives::OverflowError;
use thiserror::Error;

/// A native type has no ABI counterpart
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Machine-width integers have no fixed ABI width
    #[error("integer type `{0}` has no explicit bit width")]
    UnsizedInteger(&'static str),

    /// Integer width outside 8..=256 or not a multiple of 8
    #[error("invalid integer width: {0}")]
    InvalidIntegerWidth(usize),

    /// Byte arrays only map to `bytes1`..`bytes32` or `address`
    #[error("byte array of length {0} has no fixed bytes counterpart")]
    ByteArrayLength(usize),

    /// Struct field that is not visible outside its module
    #[error("field `{field}` of `{ty}` is not exported")]
    UnexportedField {
        /// Struct name
        ty: String,
        /// Field name
        field: String,
    },

    /// Kind with no ABI representation
    #[error("unsupported type: {0}")]
    Unsupported(String),

    /// Value shape does not follow its declared type
    #[error("value does not match declared type `{0}`")]
    ShapeMismatch(String),
}

/// Encoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Type mapping failed
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Token kind does not fit the ABI type
    #[error("cannot encode {found} as {expected}")]
    TypeMismatch {
        /// ABI type
        expected: String,
        /// Offending value kind
        found: &'static str,
    },

    /// Integer out of range for its ABI width
    #[error("value {value} out of range for {ty}")]
    ValueOutOfRange {
        /// ABI type
        ty: String,
        /// Offending value
        value: String,
    },

    /// Wrong number of elements
    #[error("{ty}: expected {expected} elements, got {got}")]
    LengthMismatch {
        /// ABI type
        ty: String,
        /// Expected count
        expected: usize,
        /// Actual count
        got: usize,
    },

    /// Nil pointer where a value is required
    #[error("nil pointer for {0}")]
    NilPointer(String),
}

/// Decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Type mapping failed
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Data ends before the value does
    #[error("insufficient data: need {need} bytes, have {have}")]
    InsufficientData {
        /// Required length
        need: usize,
        /// Actual length
        have: usize,
    },

    /// Malformed word, offset or length
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// String payload is not UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Value does not fit the target type
    #[error(transparent)]
    Overflow(#[from] OverflowError),

    /// Token kind does not fit the target type
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// Target type
        expected: String,
        /// Decoded token kind
        found: &'static str,
    },

    /// Struct field absent from the decoded values
    #[error("missing field `{0}` in decoded values")]
    MissingField(String),

    /// Target has no struct shape to rebuild from named values
    #[error("`{0}` cannot be rebuilt from named values")]
    NotAStruct(String),

    /// Method declares no output
    #[error("method has no output to decode")]
    MissingOutput,
}
