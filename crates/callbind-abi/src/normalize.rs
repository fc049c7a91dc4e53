//! Substitution of domain wrapper values with their canonical form
//!
//! Before encoding, every [`CustomValue`] in an argument tree is replaced by
//! the plain big integer (or tuple) it stands for. Containers are rebuilt
//! with substituted elements; everything else passes through unchanged, so
//! normalizing an already normalized value is a no-op.

use callbind_primitives::{Address, MessageIdentifier, I256, U256};

use crate::error::TypeError;
use crate::native::{CustomKind, CustomValue, NativeType, Value};

/// Replace domain wrapper values in `value`, guided by its declared type.
///
/// A wrapper reached through any number of pointers collapses to its
/// canonical value; a nil pointer along the way yields zero.
pub fn normalize(ty: &NativeType, value: Value) -> Result<Value, TypeError> {
    if let Some(kind) = custom_target(ty) {
        return match strip_pointers(value) {
            None => Ok(zero_value(kind)),
            Some(Value::Custom(custom)) => Ok(canonical_value(custom)),
            // already substituted
            Some(value @ (Value::Uint(_) | Value::Int(_) | Value::Struct(_))) => Ok(value),
            Some(_) => Err(TypeError::ShapeMismatch(ty.to_string())),
        };
    }

    match (ty, value) {
        (NativeType::Pointer(inner), Value::Pointer(Some(pointee))) => Ok(Value::Pointer(Some(
            Box::new(normalize(inner, *pointee)?),
        ))),
        (NativeType::Struct(st), Value::Struct(values)) => {
            if values.len() != st.fields.len() {
                return Err(TypeError::ShapeMismatch(st.name.clone()));
            }
            let mut out = Vec::with_capacity(values.len());
            for (field, (name, value)) in st.fields.iter().zip(values) {
                if !field.exported {
                    return Err(TypeError::UnexportedField {
                        ty: st.name.clone(),
                        field: field.name.clone(),
                    });
                }
                out.push((name, normalize(&field.ty, value)?));
            }
            Ok(Value::Struct(out))
        }
        (NativeType::Array(inner, _), Value::Array(items)) => Ok(Value::Array(
            items
                .into_iter()
                .map(|item| normalize(inner, item))
                .collect::<Result<_, _>>()?,
        )),
        (NativeType::Slice(inner), Value::Slice(items)) => Ok(Value::Slice(
            items
                .into_iter()
                .map(|item| normalize(inner, item))
                .collect::<Result<_, _>>()?,
        )),
        (_, value) => Ok(value),
    }
}

/// The wrapper kind behind `ty`, looking through pointers
fn custom_target(ty: &NativeType) -> Option<CustomKind> {
    match ty {
        NativeType::Custom(kind) => Some(*kind),
        NativeType::Pointer(inner) => custom_target(inner),
        _ => None,
    }
}

fn strip_pointers(value: Value) -> Option<Value> {
    match value {
        Value::Pointer(Some(inner)) => strip_pointers(*inner),
        Value::Pointer(None) => None,
        value => Some(value),
    }
}

/// Canonical form of a domain wrapper value
pub fn canonical_value(custom: CustomValue) -> Value {
    match custom {
        CustomValue::Uint128(v) => Value::Uint(v.to_big()),
        CustomValue::Int128(v) => Value::Int(v.to_big()),
        CustomValue::Eth(v) => Value::Uint(v.to_big()),
        CustomValue::ChainId(v) => Value::Uint(v.to_big()),
        CustomValue::MessageIdentifier(id) => identifier_value(&id),
    }
}

fn identifier_value(id: &MessageIdentifier) -> Value {
    Value::Struct(vec![
        ("origin".to_string(), Value::Bytes(id.origin.as_bytes().to_vec())),
        ("block_number".to_string(), Value::Uint(U256::from(id.block_number))),
        ("log_index".to_string(), Value::Uint(U256::from(id.log_index))),
        ("timestamp".to_string(), Value::Uint(U256::from(id.timestamp))),
        ("chain_id".to_string(), Value::Uint(id.chain_id.to_big())),
    ])
}

fn zero_value(kind: CustomKind) -> Value {
    match kind {
        CustomKind::Uint128 | CustomKind::Eth | CustomKind::ChainId => Value::Uint(U256::zero()),
        CustomKind::Int128 => Value::Int(I256::ZERO),
        CustomKind::MessageIdentifier => identifier_value(&MessageIdentifier {
            origin: Address::ZERO,
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{FieldType, StructType};
    use callbind_primitives::{ChainId, Eth, Int128, Uint128};

    fn pair_type() -> NativeType {
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

    fn pair_value(a: Option<u128>, b: i128) -> Value {
        Value::Struct(vec![
            (
                "a".to_string(),
                Value::Pointer(a.map(|a| Box::new(Value::Custom(CustomValue::Uint128(Uint128(a)))))),
            ),
            ("b".to_string(), Value::Custom(CustomValue::Int128(Int128(b)))),
        ])
    }

    #[test]
    fn test_top_level_wrappers() {
        let ty = NativeType::Custom(CustomKind::Uint128);
        let value = Value::Custom(CustomValue::Uint128(Uint128(1337)));
        assert_eq!(normalize(&ty, value).unwrap(), Value::Uint(U256::from(1337)));

        let ty = NativeType::Custom(CustomKind::Eth);
        let value = Value::Custom(CustomValue::Eth(Eth::gwei(2)));
        assert_eq!(
            normalize(&ty, value).unwrap(),
            Value::Uint(U256::from(2_000_000_000u64))
        );

        let ty = NativeType::Custom(CustomKind::ChainId);
        let value = Value::Custom(CustomValue::ChainId(ChainId::new(10)));
        assert_eq!(normalize(&ty, value).unwrap(), Value::Uint(U256::from(10)));
    }

    #[test]
    fn test_pointer_chain_collapses() {
        let ty = NativeType::Pointer(Box::new(NativeType::Pointer(Box::new(
            NativeType::Custom(CustomKind::Int128),
        ))));
        let value = Value::Pointer(Some(Box::new(Value::Pointer(Some(Box::new(
            Value::Custom(CustomValue::Int128(Int128(-7331))),
        ))))));
        assert_eq!(
            normalize(&ty, value).unwrap(),
            Value::Int(I256::from_i128(-7331))
        );
    }

    #[test]
    fn test_nil_pointer_to_wrapper_is_zero() {
        let ty = NativeType::Pointer(Box::new(NativeType::Custom(CustomKind::Uint128)));
        assert_eq!(
            normalize(&ty, Value::Pointer(None)).unwrap(),
            Value::Uint(U256::zero())
        );
    }

    #[test]
    fn test_struct_fields_substituted() {
        let out = normalize(&pair_type(), pair_value(Some(1337), -7331)).unwrap();
        assert_eq!(
            out,
            Value::Struct(vec![
                ("a".to_string(), Value::Uint(U256::from(1337))),
                ("b".to_string(), Value::Int(I256::from_i128(-7331))),
            ])
        );

        let nil = normalize(&pair_type(), pair_value(None, 0)).unwrap();
        let Value::Struct(fields) = nil else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].1, Value::Uint(U256::zero()));
    }

    #[test]
    fn test_containers_rebuilt() {
        let ty = NativeType::Slice(Box::new(pair_type()));
        let value = Value::Slice(vec![pair_value(Some(1), 2), pair_value(Some(3), 4)]);
        let Value::Slice(items) = normalize(&ty, value).unwrap() else {
            panic!("expected slice");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(&items[1], Value::Struct(f) if f[1].1 == Value::Int(I256::from_i128(4))));

        let ty = NativeType::Array(Box::new(pair_type()), 1);
        let value = Value::Array(vec![pair_value(Some(9), -9)]);
        assert!(matches!(normalize(&ty, value).unwrap(), Value::Array(items) if items.len() == 1));
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(&pair_type(), pair_value(Some(1337), -7331)).unwrap();
        let twice = normalize(&pair_type(), once.clone()).unwrap();
        assert_eq!(once, twice);

        let plain = Value::Bytes(vec![1, 2, 3]);
        assert_eq!(normalize(&NativeType::ByteSlice, plain.clone()).unwrap(), plain);
    }

    #[test]
    fn test_unexported_field_rejected() {
        let ty = NativeType::Struct(StructType {
            name: "Hidden".to_string(),
            fields: vec![FieldType {
                name: "inner".to_string(),
                exported: false,
                ty: NativeType::Bool,
            }],
        });
        let value = Value::Struct(vec![("inner".to_string(), Value::Bool(true))]);
        assert!(matches!(
            normalize(&ty, value),
            Err(TypeError::UnexportedField { .. })
        ));
    }

    #[test]
    fn test_message_identifier() {
        let id = MessageIdentifier {
            origin: Address::from_bytes([0x11; 20]),
            block_number: 7,
            log_index: 2,
            timestamp: 1_700_000_000,
            chain_id: ChainId::new(10),
        };
        let ty = NativeType::Custom(CustomKind::MessageIdentifier);
        let Value::Struct(fields) =
            normalize(&ty, Value::Custom(CustomValue::MessageIdentifier(id))).unwrap()
        else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0].1, Value::Bytes(vec![0x11; 20]));
        assert_eq!(fields[4].1, Value::Uint(U256::from(10)));
    }
}
