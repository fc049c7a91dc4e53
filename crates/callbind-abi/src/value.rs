//! Conversion between Rust values and the codec's dynamic representations

use callbind_primitives::{
    Address, ChainId, Eth, Int128, MessageIdentifier, OverflowError, Uint128, H256, I256, U256,
};

use crate::config::OverflowPolicy;
use crate::decode::Decoded;
use crate::error::{DecodeError, TypeError};
use crate::mapper::to_param_type;
use crate::native::{CustomKind, CustomValue, FieldType, NativeType, StructType, Value};
use crate::types::{ParamType, Token};

/// A Rust type that can travel through the codec.
///
/// Implementations describe the type's shape, produce its dynamic value for
/// encoding and rebuild it from decoded tokens. Structs get an implementation
/// from [`abi_struct!`](crate::abi_struct).
pub trait AbiValue: Sized {
    /// Whether the type is a single byte; byte arrays and vectors of such a
    /// type map to `bytesN`/`bytes` instead of arrays
    #[doc(hidden)]
    const IS_BYTE: bool = false;

    /// Shape of the type
    fn native_type() -> NativeType;

    /// Dynamic value for encoding
    fn to_value(&self) -> Value;

    /// Rebuild from a decoded token
    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError>;

    /// Rebuild from named values decoded as separate top-level outputs.
    /// Only struct-like types support this.
    fn from_fields(fields: Fields, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        let _ = (fields, policy);
        Err(DecodeError::NotAStruct(Self::native_type().to_string()))
    }

    /// ABI type of the type
    fn param_type() -> Result<ParamType, TypeError> {
        to_param_type(&Self::native_type())
    }

    #[doc(hidden)]
    fn as_byte(&self) -> Option<u8> {
        None
    }

    #[doc(hidden)]
    fn from_byte(byte: u8) -> Option<Self> {
        let _ = byte;
        None
    }
}

/// A method return type
pub trait AbiOutput: Sized {
    /// Shape of the output, `None` for methods returning nothing
    fn output_type() -> Option<NativeType>;

    /// Rebuild from the result of [`decode_output`](crate::decode_output)
    fn from_output(decoded: Option<Decoded>, policy: OverflowPolicy)
        -> Result<Self, DecodeError>;
}

impl<T: AbiValue> AbiOutput for T {
    fn output_type() -> Option<NativeType> {
        Some(T::native_type())
    }

    fn from_output(decoded: Option<Decoded>, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match decoded {
            Some(Decoded::Value(token)) => T::from_token(token, policy),
            Some(Decoded::Fields(fields)) => T::from_fields(Fields::new(fields), policy),
            None => Err(DecodeError::MissingOutput),
        }
    }
}

impl AbiOutput for () {
    fn output_type() -> Option<NativeType> {
        None
    }

    fn from_output(
        _decoded: Option<Decoded>,
        _policy: OverflowPolicy,
    ) -> Result<Self, DecodeError> {
        Ok(())
    }
}

/// Named values decoded as separate top-level outputs
#[derive(Debug, Clone)]
pub struct Fields {
    entries: Vec<(String, Option<Token>)>,
}

impl Fields {
    /// Wrap decoded name/token pairs
    pub fn new(entries: Vec<(String, Token)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(n, t)| (n, Some(t))).collect(),
        }
    }

    /// Take the raw token named `name`
    pub fn take_token(&mut self, name: &str) -> Result<Token, DecodeError> {
        self.entries
            .iter_mut()
            .find(|(n, t)| n == name && t.is_some())
            .and_then(|(_, t)| t.take())
            .ok_or_else(|| DecodeError::MissingField(name.to_string()))
    }

    /// Take the value named `name` and convert it
    pub fn take<T: AbiValue>(
        &mut self,
        name: &str,
        policy: OverflowPolicy,
    ) -> Result<T, DecodeError> {
        T::from_token(self.take_token(name)?, policy)
    }

    /// Take the value of an unnamed component by position
    pub fn take_at<T: AbiValue>(
        &mut self,
        index: usize,
        policy: OverflowPolicy,
    ) -> Result<T, DecodeError> {
        self.take(&format!("arg{index}"), policy)
    }
}

/// Sequential reader over the members of a decoded tuple
#[derive(Debug)]
pub struct TupleTokens {
    tokens: std::vec::IntoIter<Token>,
    ty: &'static str,
}

impl TupleTokens {
    /// Open `token` as a tuple of exactly `arity` members
    pub fn new(token: Token, arity: usize, ty: &'static str) -> Result<Self, DecodeError> {
        match token {
            Token::Tuple(tokens) if tokens.len() == arity => Ok(Self {
                tokens: tokens.into_iter(),
                ty,
            }),
            other => Err(unexpected(ty, &other)),
        }
    }

    /// Convert the next member
    pub fn next<T: AbiValue>(&mut self, policy: OverflowPolicy) -> Result<T, DecodeError> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| DecodeError::MissingField(self.ty.to_string()))?;
        T::from_token(token, policy)
    }
}

fn unexpected(expected: impl ToString, token: &Token) -> DecodeError {
    DecodeError::UnexpectedToken {
        expected: expected.to_string(),
        found: token.kind(),
    }
}

/// Apply the overflow policy to a narrowing conversion
fn narrow<T: Default>(
    result: Result<T, OverflowError>,
    policy: OverflowPolicy,
) -> Result<T, DecodeError> {
    match (result, policy) {
        (Ok(value), _) => Ok(value),
        (Err(e), OverflowPolicy::Error) => Err(e.into()),
        (Err(e), OverflowPolicy::Zero) => {
            tracing::debug!(error = %e, "overflow replaced with zero");
            Ok(T::default())
        }
    }
}

impl AbiValue for bool {
    fn native_type() -> NativeType {
        NativeType::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Bool(b) => Ok(b),
            other => Err(unexpected("bool", &other)),
        }
    }
}

impl AbiValue for String {
    fn native_type() -> NativeType {
        NativeType::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::String(s) => Ok(s),
            other => Err(unexpected("String", &other)),
        }
    }
}

impl AbiValue for u8 {
    const IS_BYTE: bool = true;

    fn native_type() -> NativeType {
        NativeType::Uint(Some(8))
    }

    fn to_value(&self) -> Value {
        Value::Uint(U256::from(*self))
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Uint(v) if v.bits() <= 8 => Ok(v.low_u32() as u8),
            Token::Uint(v) => Err(OverflowError::new("u8", v).into()),
            other => Err(unexpected("u8", &other)),
        }
    }

    fn as_byte(&self) -> Option<u8> {
        Some(*self)
    }

    fn from_byte(byte: u8) -> Option<Self> {
        Some(byte)
    }
}

macro_rules! impl_uint {
    ($($t:ty => $bits:expr),*) => {$(
        impl AbiValue for $t {
            fn native_type() -> NativeType {
                NativeType::Uint(Some($bits))
            }

            fn to_value(&self) -> Value {
                Value::Uint(U256::from(*self))
            }

            fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
                match token {
                    Token::Uint(v) if v.bits() <= $bits => {
                        <$t>::try_from(v.low_u128())
                            .map_err(|_| OverflowError::new(stringify!($t), v).into())
                    }
                    Token::Uint(v) => Err(OverflowError::new(stringify!($t), v).into()),
                    other => Err(unexpected(stringify!($t), &other)),
                }
            }
        }
    )*};
}

impl_uint!(u16 => 16, u32 => 32, u64 => 64, u128 => 128);

macro_rules! impl_int {
    ($($t:ty => $bits:expr),*) => {$(
        impl AbiValue for $t {
            fn native_type() -> NativeType {
                NativeType::Int(Some($bits))
            }

            fn to_value(&self) -> Value {
                Value::Int(I256::from_i128(i128::from(*self)))
            }

            fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
                match token {
                    Token::Int(v) => v
                        .to_i128()
                        .and_then(|n| <$t>::try_from(n).ok())
                        .ok_or_else(|| OverflowError::new(stringify!($t), v).into()),
                    other => Err(unexpected(stringify!($t), &other)),
                }
            }
        }
    )*};
}

impl_int!(i8 => 8, i16 => 16, i32 => 32, i64 => 64, i128 => 128);

impl AbiValue for usize {
    fn native_type() -> NativeType {
        NativeType::Uint(None)
    }

    fn to_value(&self) -> Value {
        Value::Uint(U256::from(*self as u64))
    }

    fn from_token(_token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        Err(TypeError::UnsizedInteger("usize").into())
    }
}

impl AbiValue for isize {
    fn native_type() -> NativeType {
        NativeType::Int(None)
    }

    fn to_value(&self) -> Value {
        Value::Int(I256::from_i128(*self as i128))
    }

    fn from_token(_token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        Err(TypeError::UnsizedInteger("isize").into())
    }
}

impl AbiValue for U256 {
    fn native_type() -> NativeType {
        NativeType::BigUint
    }

    fn to_value(&self) -> Value {
        Value::Uint(*self)
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Uint(v) => Ok(v),
            other => Err(unexpected("U256", &other)),
        }
    }
}

impl AbiValue for I256 {
    fn native_type() -> NativeType {
        NativeType::BigInt
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Int(v) => Ok(v),
            other => Err(unexpected("I256", &other)),
        }
    }
}

impl AbiValue for Address {
    fn native_type() -> NativeType {
        NativeType::ByteArray {
            len: Address::LEN,
            address: true,
        }
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.as_bytes().to_vec())
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Address(a) => Ok(a),
            other => Err(unexpected("Address", &other)),
        }
    }
}

impl AbiValue for H256 {
    fn native_type() -> NativeType {
        NativeType::ByteArray {
            len: H256::LEN,
            address: false,
        }
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.as_bytes().to_vec())
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::FixedBytes(b) => {
                H256::from_slice(&b).map_err(|e| DecodeError::InvalidData(e.to_string()))
            }
            other => Err(unexpected("H256", &other)),
        }
    }
}

impl<T: AbiValue, const N: usize> AbiValue for [T; N] {
    fn native_type() -> NativeType {
        if T::IS_BYTE {
            NativeType::ByteArray {
                len: N,
                address: false,
            }
        } else {
            NativeType::Array(Box::new(T::native_type()), N)
        }
    }

    fn to_value(&self) -> Value {
        if T::IS_BYTE {
            Value::Bytes(self.iter().filter_map(AbiValue::as_byte).collect())
        } else {
            Value::Array(self.iter().map(AbiValue::to_value).collect())
        }
    }

    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        let items: Vec<T> = match token {
            Token::FixedBytes(bytes) if T::IS_BYTE => {
                bytes.into_iter().filter_map(T::from_byte).collect()
            }
            Token::FixedArray(tokens) if !T::IS_BYTE => tokens
                .into_iter()
                .map(|t| T::from_token(t, policy))
                .collect::<Result<_, _>>()?,
            other => return Err(unexpected(Self::native_type(), &other)),
        };
        let got = items.len();
        items.try_into().map_err(|_| {
            DecodeError::InvalidData(format!("expected {N} elements, got {got}"))
        })
    }
}

impl<T: AbiValue> AbiValue for Vec<T> {
    fn native_type() -> NativeType {
        if T::IS_BYTE {
            NativeType::ByteSlice
        } else {
            NativeType::Slice(Box::new(T::native_type()))
        }
    }

    fn to_value(&self) -> Value {
        if T::IS_BYTE {
            Value::Bytes(self.iter().filter_map(AbiValue::as_byte).collect())
        } else {
            Value::Slice(self.iter().map(AbiValue::to_value).collect())
        }
    }

    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Bytes(bytes) if T::IS_BYTE => {
                Ok(bytes.into_iter().filter_map(T::from_byte).collect())
            }
            Token::Array(tokens) if !T::IS_BYTE => tokens
                .into_iter()
                .map(|t| T::from_token(t, policy))
                .collect(),
            other => Err(unexpected(Self::native_type(), &other)),
        }
    }
}

impl AbiValue for bytes::Bytes {
    fn native_type() -> NativeType {
        NativeType::ByteSlice
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.to_vec())
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Bytes(b) => Ok(bytes::Bytes::from(b)),
            other => Err(unexpected("Bytes", &other)),
        }
    }
}

impl<T: AbiValue> AbiValue for Option<T> {
    fn native_type() -> NativeType {
        NativeType::Pointer(Box::new(T::native_type()))
    }

    fn to_value(&self) -> Value {
        Value::Pointer(self.as_ref().map(|v| Box::new(v.to_value())))
    }

    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        T::from_token(token, policy).map(Some)
    }

    fn from_fields(fields: Fields, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        T::from_fields(fields, policy).map(Some)
    }
}

impl<T: AbiValue> AbiValue for Box<T> {
    fn native_type() -> NativeType {
        NativeType::Pointer(Box::new(T::native_type()))
    }

    fn to_value(&self) -> Value {
        Value::Pointer(Some(Box::new(self.as_ref().to_value())))
    }

    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        T::from_token(token, policy).map(Box::new)
    }

    fn from_fields(fields: Fields, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        T::from_fields(fields, policy).map(Box::new)
    }
}

impl AbiValue for Uint128 {
    fn native_type() -> NativeType {
        NativeType::Custom(CustomKind::Uint128)
    }

    fn to_value(&self) -> Value {
        Value::Custom(CustomValue::Uint128(*self))
    }

    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Uint(v) => narrow(Uint128::try_from_big(v), policy),
            other => Err(unexpected("Uint128", &other)),
        }
    }
}

impl AbiValue for Int128 {
    fn native_type() -> NativeType {
        NativeType::Custom(CustomKind::Int128)
    }

    fn to_value(&self) -> Value {
        Value::Custom(CustomValue::Int128(*self))
    }

    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Int(v) => narrow(Int128::try_from_big(v), policy),
            other => Err(unexpected("Int128", &other)),
        }
    }
}

impl AbiValue for Eth {
    fn native_type() -> NativeType {
        NativeType::Custom(CustomKind::Eth)
    }

    fn to_value(&self) -> Value {
        Value::Custom(CustomValue::Eth(*self))
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Uint(v) => Ok(Eth::from_big(v)),
            other => Err(unexpected("Eth", &other)),
        }
    }
}

impl AbiValue for ChainId {
    fn native_type() -> NativeType {
        NativeType::Custom(CustomKind::ChainId)
    }

    fn to_value(&self) -> Value {
        Value::Custom(CustomValue::ChainId(*self))
    }

    fn from_token(token: Token, _policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Uint(v) => Ok(ChainId::from_big(v)),
            other => Err(unexpected("ChainId", &other)),
        }
    }
}

fn narrow_u64(
    token: Token,
    target: &'static str,
    policy: OverflowPolicy,
) -> Result<u64, DecodeError> {
    match token {
        Token::Uint(v) => {
            let fits = if v.bits() <= 64 {
                Ok(v.low_u64())
            } else {
                Err(OverflowError::new(target, v))
            };
            narrow(fits, policy)
        }
        other => Err(unexpected(target, &other)),
    }
}

fn identifier_from_parts(
    origin: Token,
    block_number: Token,
    log_index: Token,
    timestamp: Token,
    chain_id: Token,
    policy: OverflowPolicy,
) -> Result<MessageIdentifier, DecodeError> {
    let log_index = narrow_u64(log_index, "logIndex", policy)?;
    Ok(MessageIdentifier {
        origin: Address::from_token(origin, policy)?,
        block_number: narrow_u64(block_number, "blockNumber", policy)?,
        log_index: narrow(
            u32::try_from(log_index).map_err(|_| OverflowError::new("logIndex", log_index)),
            policy,
        )?,
        timestamp: narrow_u64(timestamp, "timestamp", policy)?,
        chain_id: ChainId::from_token(chain_id, policy)?,
    })
}

impl AbiValue for MessageIdentifier {
    fn native_type() -> NativeType {
        NativeType::Custom(CustomKind::MessageIdentifier)
    }

    fn to_value(&self) -> Value {
        Value::Custom(CustomValue::MessageIdentifier(*self))
    }

    fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        match token {
            Token::Tuple(tokens) if tokens.len() == 5 => {
                let [origin, block_number, log_index, timestamp, chain_id]: [Token; 5] = tokens
                    .try_into()
                    .map_err(|_| DecodeError::MissingField("MessageIdentifier".to_string()))?;
                identifier_from_parts(origin, block_number, log_index, timestamp, chain_id, policy)
            }
            other => Err(unexpected("MessageIdentifier", &other)),
        }
    }

    fn from_fields(mut fields: Fields, policy: OverflowPolicy) -> Result<Self, DecodeError> {
        let mut raw = |name: &str| fields.take_token(name);
        identifier_from_parts(
            raw("origin")?,
            raw("blockNumber")?,
            raw("logIndex")?,
            raw("timestamp")?,
            raw("chainId")?,
            policy,
        )
    }
}

macro_rules! impl_tuple {
    ($arity:expr; $($name:ident : $idx:tt),+) => {
        impl<$($name: AbiValue),+> AbiValue for ($($name,)+) {
            fn native_type() -> NativeType {
                NativeType::Struct(StructType {
                    name: "tuple".to_string(),
                    fields: vec![$(FieldType::new(String::new(), $name::native_type())),+],
                })
            }

            fn to_value(&self) -> Value {
                Value::Struct(vec![$((String::new(), self.$idx.to_value())),+])
            }

            fn from_token(token: Token, policy: OverflowPolicy) -> Result<Self, DecodeError> {
                let mut tokens = TupleTokens::new(token, $arity, "tuple")?;
                Ok(($(tokens.next::<$name>(policy)?,)+))
            }

            fn from_fields(mut fields: Fields, policy: OverflowPolicy) -> Result<Self, DecodeError> {
                Ok(($(fields.take_at::<$name>($idx, policy)?,)+))
            }
        }
    };
}

impl_tuple!(1; A: 0);
impl_tuple!(2; A: 0, B: 1);
impl_tuple!(3; A: 0, B: 1, C: 2);
impl_tuple!(4; A: 0, B: 1, C: 2, D: 3);
impl_tuple!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
