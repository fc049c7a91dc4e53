//! ABI encoding

use callbind_primitives::{Address, I256, U256};

use crate::error::EncodeError;
use crate::mapper::to_param_type;
use crate::native::{Argument, Value};
use crate::normalize::normalize;
use crate::selector::{function_selector, function_signature};
use crate::types::{ParamType, Token};

/// Encode tokens according to their ABI types
pub fn encode(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, EncodeError> {
    if types.len() != tokens.len() {
        return Err(EncodeError::LengthMismatch {
            ty: "arguments".to_string(),
            expected: types.len(),
            got: tokens.len(),
        });
    }
    let types: Vec<&ParamType> = types.iter().collect();
    encode_params(&types, tokens)
}

/// Encode function call (selector + params)
pub fn encode_function_call(
    selector: [u8; 4],
    types: &[ParamType],
    tokens: &[Token],
) -> Result<Vec<u8>, EncodeError> {
    let mut result = selector.to_vec();
    result.extend(encode(types, tokens)?);
    Ok(result)
}

/// Build call data for `method` from native arguments.
///
/// Each argument has its domain wrappers substituted, its type mapped to an
/// ABI type, and is packed after the selector of the resulting signature.
pub fn encode_call(method: &str, args: Vec<Argument>) -> Result<Vec<u8>, EncodeError> {
    let mut types = Vec::with_capacity(args.len());
    let mut tokens = Vec::with_capacity(args.len());
    for arg in args {
        let value = normalize(&arg.ty, arg.value)?;
        let kind = to_param_type(&arg.ty)?;
        tokens.push(tokenize(value, &kind)?);
        types.push(kind);
    }

    let signature = function_signature(method, &types);
    let selector = function_selector(&signature);
    let data = encode_function_call(selector, &types, &tokens)?;
    tracing::trace!(
        signature = %signature,
        selector = %hex::encode(selector),
        size = data.len(),
        "encoded call"
    );
    Ok(data)
}

/// Convert a normalized value to a token of the given ABI type
pub fn tokenize(value: Value, kind: &ParamType) -> Result<Token, EncodeError> {
    match (kind, value) {
        (_, Value::Pointer(Some(inner))) => tokenize(*inner, kind),
        (_, Value::Pointer(None)) => Err(EncodeError::NilPointer(kind.canonical())),
        (ParamType::Bool, Value::Bool(b)) => Ok(Token::Bool(b)),
        (ParamType::String, Value::String(s)) => Ok(Token::String(s)),
        (ParamType::Uint(bits), Value::Uint(v)) => {
            if v.bits() > *bits {
                return Err(out_of_range(kind, v));
            }
            Ok(Token::Uint(v))
        }
        (ParamType::Uint(bits), Value::Int(v)) => match v.to_unsigned() {
            Some(abs) if abs.bits() <= *bits => Ok(Token::Uint(abs)),
            _ => Err(out_of_range(kind, v)),
        },
        (ParamType::Int(bits), Value::Int(v)) => {
            if !v.fits_bits(*bits) {
                return Err(out_of_range(kind, v));
            }
            Ok(Token::Int(v))
        }
        (ParamType::Int(bits), Value::Uint(v)) => match I256::from_unsigned(v) {
            Some(signed) if signed.fits_bits(*bits) => Ok(Token::Int(signed)),
            _ => Err(out_of_range(kind, v)),
        },
        (ParamType::Address, Value::Bytes(bytes)) => Address::from_slice(&bytes)
            .map(Token::Address)
            .map_err(|_| length_mismatch(kind, Address::LEN, bytes.len())),
        (ParamType::FixedBytes(size), Value::Bytes(bytes)) => {
            if bytes.len() != *size {
                return Err(length_mismatch(kind, *size, bytes.len()));
            }
            Ok(Token::FixedBytes(bytes))
        }
        (ParamType::Bytes, Value::Bytes(bytes)) => Ok(Token::Bytes(bytes)),
        (ParamType::Array(inner), Value::Slice(items)) => Ok(Token::Array(
            items
                .into_iter()
                .map(|item| tokenize(item, inner))
                .collect::<Result<_, _>>()?,
        )),
        (ParamType::FixedArray(inner, size), Value::Array(items)) => {
            if items.len() != *size {
                return Err(length_mismatch(kind, *size, items.len()));
            }
            Ok(Token::FixedArray(
                items
                    .into_iter()
                    .map(|item| tokenize(item, inner))
                    .collect::<Result<_, _>>()?,
            ))
        }
        (ParamType::Tuple(fields), Value::Struct(values)) => {
            if values.len() != fields.len() {
                return Err(length_mismatch(kind, fields.len(), values.len()));
            }
            Ok(Token::Tuple(
                fields
                    .iter()
                    .zip(values)
                    .map(|(field, (_, value))| tokenize(value, &field.kind))
                    .collect::<Result<_, _>>()?,
            ))
        }
        (_, value) => Err(EncodeError::TypeMismatch {
            expected: kind.canonical(),
            found: value.kind(),
        }),
    }
}

fn out_of_range(kind: &ParamType, value: impl ToString) -> EncodeError {
    EncodeError::ValueOutOfRange {
        ty: kind.canonical(),
        value: value.to_string(),
    }
}

fn length_mismatch(kind: &ParamType, expected: usize, got: usize) -> EncodeError {
    EncodeError::LengthMismatch {
        ty: kind.canonical(),
        expected,
        got,
    }
}

/// Encode parameters as one head/tail block.
///
/// Offsets of dynamic members are relative to the start of the block.
fn encode_params(types: &[&ParamType], tokens: &[Token]) -> Result<Vec<u8>, EncodeError> {
    // Calculate head size (fixed part)
    let head_size = types.iter().map(|t| t.head_length()).sum::<usize>();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens) {
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend(encode_u256(&U256::from(offset)));
            tail.extend(encode_token(param_type, token)?);
        } else {
            head.extend(encode_token(param_type, token)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Encode a single token
fn encode_token(param_type: &ParamType, token: &Token) -> Result<Vec<u8>, EncodeError> {
    match (param_type, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut buf = [0u8; 32];
            buf[12..32].copy_from_slice(addr.as_bytes());
            Ok(buf.to_vec())
        }
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if value.bits() > *bits {
                return Err(out_of_range(param_type, value));
            }
            Ok(encode_u256(value))
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            if !value.fits_bits(*bits) {
                return Err(out_of_range(param_type, value));
            }
            Ok(value.to_be_bytes().to_vec())
        }
        (ParamType::Bool, Token::Bool(b)) => {
            let mut buf = [0u8; 32];
            buf[31] = u8::from(*b);
            Ok(buf.to_vec())
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) => {
            if data.len() != *size || *size > 32 {
                return Err(length_mismatch(param_type, *size, data.len()));
            }
            let mut buf = [0u8; 32];
            buf[..data.len()].copy_from_slice(data);
            Ok(buf.to_vec())
        }
        (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
        (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = encode_u256(&U256::from(tokens.len()));
            let inner_types = vec![inner.as_ref(); tokens.len()];
            result.extend(encode_params(&inner_types, tokens)?);
            Ok(result)
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens)) => {
            if tokens.len() != *size {
                return Err(length_mismatch(param_type, *size, tokens.len()));
            }
            let inner_types = vec![inner.as_ref(); tokens.len()];
            encode_params(&inner_types, tokens)
        }
        (ParamType::Tuple(fields), Token::Tuple(tokens)) => {
            if tokens.len() != fields.len() {
                return Err(length_mismatch(param_type, fields.len(), tokens.len()));
            }
            let inner_types: Vec<&ParamType> = fields.iter().map(|f| &f.kind).collect();
            encode_params(&inner_types, tokens)
        }
        _ => Err(EncodeError::TypeMismatch {
            expected: param_type.canonical(),
            found: token.kind(),
        }),
    }
}

/// Encode a U256 as 32 bytes
fn encode_u256(value: &U256) -> Vec<u8> {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes.to_vec()
}

/// Encode dynamic bytes
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_u256(&U256::from(data.len()));

    // Pad to 32 bytes
    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TupleField;

    fn word(hex_str: &str) -> String {
        format!("{:0>64}", hex_str)
    }

    #[test]
    fn test_encode_address() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let encoded = encode(&[ParamType::Address], &[Token::Address(addr)]).unwrap();

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[12..32], addr.as_bytes());
    }

    #[test]
    fn test_encode_negative_int() {
        let encoded = encode(&[ParamType::Int(128)], &[Token::Int(I256::from_i128(-7331))]).unwrap();
        assert_eq!(hex::encode(encoded), format!("{:f>64}", "e35d"));
    }

    #[test]
    fn test_encode_dynamic_bytes() {
        let encoded = encode(&[ParamType::Bytes], &[Token::Bytes(vec![0xde, 0xad])]).unwrap();
        let expected = [word("20"), word("2"), format!("{:0<64}", "dead")].concat();
        assert_eq!(hex::encode(encoded), expected);
    }

    #[test]
    fn test_encode_empty_bytes_has_no_payload() {
        let encoded = encode(&[ParamType::Bytes], &[Token::Bytes(vec![])]).unwrap();
        assert_eq!(encoded.len(), 64);
    }

    #[test]
    fn test_static_tuple_inline() {
        let pair = ParamType::Tuple(vec![
            TupleField::new("a", ParamType::Uint(128)),
            TupleField::new("b", ParamType::Int(128)),
        ]);
        let token = Token::Tuple(vec![
            Token::Uint(U256::from(1337)),
            Token::Int(I256::from_i128(-7331)),
        ]);
        let encoded = encode(&[pair], &[token]).unwrap();
        assert_eq!(
            hex::encode(encoded),
            [word("539"), format!("{:f>64}", "e35d")].concat()
        );
    }

    #[test]
    fn test_dynamic_array_offsets_relative_to_block() {
        let kind = ParamType::Array(Box::new(ParamType::Bytes));
        let token = Token::Array(vec![Token::Bytes(vec![0xaa]), Token::Bytes(vec![0xbb])]);
        let encoded = hex::encode(encode(&[kind], &[token]).unwrap());
        let expected = [
            word("20"),
            word("2"),
            word("40"),
            word("80"),
            word("1"),
            format!("{:0<64}", "aa"),
            word("1"),
            format!("{:0<64}", "bb"),
        ]
        .concat();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_encode_rejects_mismatch() {
        let err = encode(&[ParamType::Uint(256)], &[Token::Bool(true)]).unwrap_err();
        assert!(matches!(err, EncodeError::TypeMismatch { .. }));

        let err = encode(&[ParamType::Uint(8)], &[Token::Uint(U256::from(256))]).unwrap_err();
        assert!(matches!(err, EncodeError::ValueOutOfRange { .. }));

        let err = encode(&[ParamType::Bool], &[]).unwrap_err();
        assert!(matches!(err, EncodeError::LengthMismatch { .. }));
    }

    #[test]
    fn test_tokenize_range_checks() {
        assert_eq!(
            tokenize(Value::Int(I256::from_i128(5)), &ParamType::Uint(8)).unwrap(),
            Token::Uint(U256::from(5))
        );
        assert!(tokenize(Value::Int(I256::from_i128(-5)), &ParamType::Uint(8)).is_err());
        assert!(tokenize(Value::Uint(U256::from(128)), &ParamType::Int(8)).is_err());
        assert!(matches!(
            tokenize(Value::Pointer(None), &ParamType::Bool),
            Err(EncodeError::NilPointer(_))
        ));
    }

    #[test]
    fn test_tokenize_fixed_bytes_length() {
        let err = tokenize(Value::Bytes(vec![0; 31]), &ParamType::FixedBytes(32)).unwrap_err();
        assert_eq!(
            err,
            EncodeError::LengthMismatch {
                ty: "bytes32".to_string(),
                expected: 32,
                got: 31,
            }
        );
    }

    #[test]
    fn test_encode_call_selector_prefix() {
        let data = encode_call(
            "transfer",
            vec![
                Argument::new(
                    crate::NativeType::ByteArray {
                        len: 20,
                        address: true,
                    },
                    Value::Bytes(vec![0; 20]),
                ),
                Argument::new(crate::NativeType::BigUint, Value::Uint(U256::from(1000))),
            ],
        )
        .unwrap();
        assert_eq!(hex::encode(&data[..4]), "a9059cbb");
        assert_eq!(data.len(), 4 + 64);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The selector depends on the signature only, never on values
            #[test]
            fn prop_selector_ignores_values(amount in any::<u128>(), raw in any::<[u8; 20]>()) {
                let to = Address::from_bytes(raw);
                let args = vec![
                    crate::Argument::of(&to),
                    crate::Argument::of(&U256::from(amount)),
                ];
                let data = encode_call("transfer", args).unwrap();
                prop_assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
                prop_assert_eq!(data.len(), 68);
            }

            /// Signed values survive an encode/decode cycle
            #[test]
            fn prop_int128_round_trip(value in any::<i128>()) {
                let kind = [ParamType::Int(128)];
                let token = Token::Int(I256::from_i128(value));
                let encoded = encode(&kind, std::slice::from_ref(&token)).unwrap();
                prop_assert_eq!(crate::decode(&kind, &encoded).unwrap(), vec![token]);
            }
        }
    }
}
