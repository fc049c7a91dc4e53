//! ABI decoding

use std::collections::HashSet;

use callbind_primitives::{Address, I256, U256};

use crate::error::DecodeError;
use crate::types::{ParamType, Token, TupleField};

/// Result of decoding return data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The data held the output as one value
    Value(Token),
    /// The data held the output struct's members as separate top-level
    /// values, keyed by component name
    Fields(Vec<(String, Token)>),
}

impl Decoded {
    /// The decoded output as a single token; named members become a tuple
    pub fn into_token(self) -> Token {
        match self {
            Decoded::Value(token) => token,
            Decoded::Fields(fields) => Token::Tuple(fields.into_iter().map(|(_, t)| t).collect()),
        }
    }
}

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, DecodeError> {
    let types: Vec<&ParamType> = types.iter().collect();
    decode_params(&types, data, 0)
}

/// Decode function return data for a method with the given output type.
///
/// The data is first read as one value of `output`. If that fails and the
/// output is a tuple, the data is read again as the tuple's components laid
/// out as separate top-level values, which is how contracts returning several
/// named values encode them. If both attempts fail, the error of the second
/// attempt is returned.
pub fn decode_output(
    data: &[u8],
    output: Option<&ParamType>,
) -> Result<Option<Decoded>, DecodeError> {
    let Some(output) = output else {
        return Ok(None);
    };

    let primary = match decode(std::slice::from_ref(output), data) {
        Ok(tokens) => {
            let token = tokens.into_iter().next().ok_or(DecodeError::MissingOutput)?;
            return Ok(Some(Decoded::Value(token)));
        }
        Err(e) => e,
    };

    let ParamType::Tuple(fields) = output else {
        return Err(primary);
    };
    tracing::debug!(
        output = %output,
        error = %primary,
        "single-value decode failed, retrying as separate values"
    );

    let types: Vec<ParamType> = fields.iter().map(|f| f.kind.clone()).collect();
    let tokens = decode(&types, data)?;
    Ok(Some(Decoded::Fields(
        argument_names(fields).into_iter().zip(tokens).collect(),
    )))
}

/// Names for tuple components decoded as separate values. Empty, `_` and
/// repeated names get a positional placeholder.
fn argument_names(fields: &[TupleField]) -> Vec<String> {
    let mut seen = HashSet::new();
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let placeholder =
                field.name.is_empty() || field.name == "_" || seen.contains(&field.name);
            let name = if placeholder {
                format!("arg{idx}")
            } else {
                field.name.clone()
            };
            seen.insert(name.clone());
            name
        })
        .collect()
}

/// Decode a head/tail block starting at `base`
fn decode_params(
    types: &[&ParamType],
    data: &[u8],
    base: usize,
) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut head = base;

    for param_type in types {
        let token = if param_type.is_dynamic() {
            let offset = read_usize(data, head)?;
            let at = base
                .checked_add(offset)
                .ok_or_else(|| DecodeError::InvalidData(format!("offset {offset} overflows")))?;
            decode_token(param_type, data, at)?
        } else {
            decode_token(param_type, data, head)?
        };
        tokens.push(token);
        head += param_type.head_length();
    }

    Ok(tokens)
}

/// Decode a single token whose encoding starts at `at`
fn decode_token(param_type: &ParamType, data: &[u8], at: usize) -> Result<Token, DecodeError> {
    match param_type {
        ParamType::Address => {
            let word = read_word(data, at)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(DecodeError::InvalidData(format!(
                    "dirty address word at {at}"
                )));
            }
            let mut addr_bytes = [0u8; 20];
            addr_bytes.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(addr_bytes)))
        }
        ParamType::Uint(bits) => {
            let value = U256::from_big_endian(read_word(data, at)?);
            if value.bits() > *bits {
                return Err(DecodeError::InvalidData(format!(
                    "{value} out of range for uint{bits} at {at}"
                )));
            }
            Ok(Token::Uint(value))
        }
        ParamType::Int(bits) => {
            let mut word = [0u8; 32];
            word.copy_from_slice(read_word(data, at)?);
            let value = I256::from_be_bytes(word);
            // upper bytes must be a sign extension of the low `bits`
            if !value.fits_bits(*bits) {
                return Err(DecodeError::InvalidData(format!(
                    "{value} out of range for int{bits} at {at}"
                )));
            }
            Ok(Token::Int(value))
        }
        ParamType::Bool => {
            let word = read_word(data, at)?;
            match U256::from_big_endian(word) {
                v if v.is_zero() => Ok(Token::Bool(false)),
                v if v == U256::one() => Ok(Token::Bool(true)),
                v => Err(DecodeError::InvalidData(format!("invalid bool {v}"))),
            }
        }
        ParamType::FixedBytes(size) => {
            let word = read_word(data, at)?;
            if *size > 32 {
                return Err(DecodeError::InvalidData(format!("bytes{size}")));
            }
            Ok(Token::FixedBytes(word[..*size].to_vec()))
        }
        ParamType::Bytes => Ok(Token::Bytes(decode_bytes(data, at)?)),
        ParamType::String => {
            let bytes = decode_bytes(data, at)?;
            let s = String::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8(e.to_string()))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, at)?;
            let base = at + 32;
            // every element takes at least one word in the head
            check_length(data, base.saturating_add(len.saturating_mul(32)))?;
            let inner_types = vec![inner.as_ref(); len];
            Ok(Token::Array(decode_params(&inner_types, data, base)?))
        }
        ParamType::FixedArray(inner, size) => {
            let inner_types = vec![inner.as_ref(); *size];
            Ok(Token::FixedArray(decode_params(&inner_types, data, at)?))
        }
        ParamType::Tuple(fields) => {
            let inner_types: Vec<&ParamType> = fields.iter().map(|f| &f.kind).collect();
            Ok(Token::Tuple(decode_params(&inner_types, data, at)?))
        }
    }
}

/// Decode dynamic bytes whose length word is at `at`
fn decode_bytes(data: &[u8], at: usize) -> Result<Vec<u8>, DecodeError> {
    let len = read_usize(data, at)?;
    let start = at + 32;
    let end = start
        .checked_add(len)
        .ok_or_else(|| DecodeError::InvalidData(format!("length {len} overflows")))?;
    check_length(data, end)?;
    Ok(data[start..end].to_vec())
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8], DecodeError> {
    let end = at
        .checked_add(32)
        .ok_or_else(|| DecodeError::InvalidData(format!("position {at} overflows")))?;
    check_length(data, end)?;
    Ok(&data[at..end])
}

/// Read a word used as an offset or length
fn read_usize(data: &[u8], at: usize) -> Result<usize, DecodeError> {
    let value = U256::from_big_endian(read_word(data, at)?);
    if value.bits() > 64 {
        return Err(DecodeError::InvalidData(format!("offset or length {value} too large")));
    }
    usize::try_from(value.low_u64())
        .map_err(|_| DecodeError::InvalidData(format!("offset or length {value} too large")))
}

/// Check that data has at least `required` bytes
fn check_length(data: &[u8], required: usize) -> Result<(), DecodeError> {
    if data.len() < required {
        return Err(DecodeError::InsufficientData {
            need: required,
            have: data.len(),
        });
    }
    Ok(())
}
