//! Native type to ABI type mapping

use heck::ToLowerCamelCase;

use crate::error::TypeError;
use crate::native::{CustomKind, NativeType};
use crate::types::{ParamType, TupleField};

/// ABI component name for a Rust field name: `gas_limit` becomes `gasLimit`
pub fn abi_field_name(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Map a native type to its ABI type.
///
/// Domain wrappers are resolved first, so `Uint128` maps to `uint128` even
/// though its storage would otherwise suggest something else. Pointers map to
/// their pointee and struct fields keep their names as tuple components.
pub fn to_param_type(ty: &NativeType) -> Result<ParamType, TypeError> {
    match ty {
        NativeType::Custom(kind) => Ok(custom_param_type(*kind)),
        NativeType::Bool => Ok(ParamType::Bool),
        NativeType::String => Ok(ParamType::String),
        NativeType::Uint(Some(bits)) => Ok(ParamType::Uint(check_width(*bits)?)),
        NativeType::Uint(None) => Err(TypeError::UnsizedInteger("usize")),
        NativeType::Int(Some(bits)) => Ok(ParamType::Int(check_width(*bits)?)),
        NativeType::Int(None) => Err(TypeError::UnsizedInteger("isize")),
        NativeType::BigUint => Ok(ParamType::Uint(256)),
        NativeType::BigInt => Ok(ParamType::Int(256)),
        NativeType::ByteArray { len: 20, address: true } => Ok(ParamType::Address),
        NativeType::ByteArray { len, .. } if (1..=32).contains(len) => {
            Ok(ParamType::FixedBytes(*len))
        }
        NativeType::ByteArray { len, .. } => Err(TypeError::ByteArrayLength(*len)),
        NativeType::Array(inner, len) => Ok(ParamType::FixedArray(
            Box::new(to_param_type(inner)?),
            *len,
        )),
        NativeType::ByteSlice => Ok(ParamType::Bytes),
        NativeType::Slice(inner) => Ok(ParamType::Array(Box::new(to_param_type(inner)?))),
        NativeType::Struct(st) => {
            let mut fields = Vec::with_capacity(st.fields.len());
            for field in &st.fields {
                if !field.exported {
                    return Err(TypeError::UnexportedField {
                        ty: st.name.clone(),
                        field: field.name.clone(),
                    });
                }
                fields.push(TupleField::new(
                    abi_field_name(&field.name),
                    to_param_type(&field.ty)?,
                ));
            }
            Ok(ParamType::Tuple(fields))
        }
        NativeType::Pointer(inner) => to_param_type(inner),
        NativeType::Unsupported(name) => Err(TypeError::Unsupported(name.clone())),
    }
}

fn check_width(bits: usize) -> Result<usize, TypeError> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(TypeError::InvalidIntegerWidth(bits));
    }
    Ok(bits)
}

/// Fixed ABI type of a domain wrapper
pub fn custom_param_type(kind: CustomKind) -> ParamType {
    match kind {
        CustomKind::Uint128 => ParamType::Uint(128),
        CustomKind::Int128 => ParamType::Int(128),
        CustomKind::Eth | CustomKind::ChainId => ParamType::Uint(256),
        CustomKind::MessageIdentifier => ParamType::Tuple(vec![
            TupleField::new("origin", ParamType::Address),
            TupleField::new("blockNumber", ParamType::Uint(256)),
            TupleField::new("logIndex", ParamType::Uint(256)),
            TupleField::new("timestamp", ParamType::Uint(256)),
            TupleField::new("chainId", ParamType::Uint(256)),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{FieldType, StructType};

    fn pair_struct() -> NativeType {
        NativeType::Struct(StructType {
            name: "TestIntStruct".to_string(),
            fields: vec![
                FieldType::new(
                    "a",
                    NativeType::Pointer(Box::new(NativeType::Custom(CustomKind::Uint128))),
                ),
                FieldType::new("b", NativeType::Custom(CustomKind::Int128)),
            ],
        })
    }

    #[test]
    fn test_scalar_mapping() {
        assert_eq!(to_param_type(&NativeType::Bool).unwrap(), ParamType::Bool);
        assert_eq!(
            to_param_type(&NativeType::Uint(Some(32))).unwrap(),
            ParamType::Uint(32)
        );
        assert_eq!(
            to_param_type(&NativeType::Int(Some(8))).unwrap(),
            ParamType::Int(8)
        );
        assert_eq!(to_param_type(&NativeType::BigInt).unwrap(), ParamType::Int(256));
        assert_eq!(to_param_type(&NativeType::ByteSlice).unwrap(), ParamType::Bytes);
    }

    #[test]
    fn test_unsized_integers_rejected() {
        assert_eq!(
            to_param_type(&NativeType::Uint(None)),
            Err(TypeError::UnsizedInteger("usize"))
        );
        assert_eq!(
            to_param_type(&NativeType::Int(None)),
            Err(TypeError::UnsizedInteger("isize"))
        );
    }

    #[test]
    fn test_byte_arrays() {
        let address = NativeType::ByteArray {
            len: 20,
            address: true,
        };
        assert_eq!(to_param_type(&address).unwrap(), ParamType::Address);

        let plain20 = NativeType::ByteArray {
            len: 20,
            address: false,
        };
        assert_eq!(to_param_type(&plain20).unwrap(), ParamType::FixedBytes(20));

        let too_long = NativeType::ByteArray {
            len: 40,
            address: false,
        };
        assert_eq!(
            to_param_type(&too_long),
            Err(TypeError::ByteArrayLength(40))
        );
    }

    #[test]
    fn test_custom_wrappers_take_precedence() {
        assert_eq!(
            to_param_type(&NativeType::Custom(CustomKind::Uint128)).unwrap(),
            ParamType::Uint(128)
        );
        assert_eq!(
            to_param_type(&NativeType::Custom(CustomKind::Eth)).unwrap(),
            ParamType::Uint(256)
        );
        let pointer = NativeType::Pointer(Box::new(NativeType::Pointer(Box::new(
            NativeType::Custom(CustomKind::Int128),
        ))));
        assert_eq!(to_param_type(&pointer).unwrap(), ParamType::Int(128));
    }

    #[test]
    fn test_struct_mapping() {
        let ty = to_param_type(&pair_struct()).unwrap();
        assert_eq!(ty.canonical(), "(uint128,int128)");

        let array = NativeType::Array(Box::new(pair_struct()), 3);
        assert_eq!(
            to_param_type(&array).unwrap().canonical(),
            "(uint128,int128)[3]"
        );
        let slice = NativeType::Slice(Box::new(pair_struct()));
        assert_eq!(
            to_param_type(&slice).unwrap().canonical(),
            "(uint128,int128)[]"
        );
    }

    #[test]
    fn test_field_names_are_camel_case() {
        let ty = NativeType::Struct(StructType {
            name: "Withdrawal".to_string(),
            fields: vec![FieldType::new("gas_limit", NativeType::BigUint)],
        });
        let ParamType::Tuple(fields) = to_param_type(&ty).unwrap() else {
            panic!("expected tuple");
        };
        assert_eq!(fields[0].name, "gasLimit");
    }

    #[test]
    fn test_unexported_field_rejected() {
        let ty = NativeType::Struct(StructType {
            name: "Hidden".to_string(),
            fields: vec![FieldType {
                name: "secret".to_string(),
                exported: false,
                ty: NativeType::Bool,
            }],
        });
        assert_eq!(
            to_param_type(&ty),
            Err(TypeError::UnexportedField {
                ty: "Hidden".to_string(),
                field: "secret".to_string(),
            })
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let ty = NativeType::Unsupported("HashMap<String, u64>".to_string());
        assert!(matches!(to_param_type(&ty), Err(TypeError::Unsupported(_))));
    }
}
