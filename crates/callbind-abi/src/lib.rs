//! # callbind-abi
//!
//! Call data codec for contract bindings.
//!
//! - [`to_param_type`]: maps a native type description to an ABI type
//! - [`normalize`]: replaces domain wrapper values with their canonical form
//! - [`encode_call`]: selector plus head/tail packed arguments
//! - [`decode_output`]: return data decoding with a fallback for outputs
//!   returned as separate values
//!
//! # Example
//!
//! ```rust
//! use callbind_abi::{encode_call, Argument};
//! use callbind_primitives::Uint128;
//!
//! let data = encode_call("getRequiredBond", vec![Argument::of(&Uint128(1337))]).unwrap();
//! assert_eq!(hex::encode(&data[..4]), "c395e1ca");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod decode;
mod encode;
mod error;
mod json;
mod macros;
mod mapper;
mod native;
mod normalize;
mod selector;
mod types;
mod value;

pub use config::{CodecConfig, OverflowPolicy};
pub use decode::{decode, decode_output, Decoded};
pub use encode::{encode, encode_call, encode_function_call, tokenize};
pub use error::{DecodeError, EncodeError, TypeError};
pub use json::{parse_type, AbiParam, FunctionFragment};
pub use mapper::{abi_field_name, custom_param_type, to_param_type};
pub use native::{Argument, CustomKind, CustomValue, FieldType, NativeType, StructType, Value};
pub use normalize::{canonical_value, normalize};
pub use selector::{function_selector, function_signature, keccak256};
pub use types::{ParamType, Token, TupleField};
pub use value::{AbiOutput, AbiValue, Fields, TupleTokens};
