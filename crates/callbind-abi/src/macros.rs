//! Struct declaration macro

/// Declare a struct and implement [`AbiValue`](crate::AbiValue) for it.
///
/// Fields map to tuple components in declaration order, named in
/// lowerCamelCase. Fields declared without `pub` are recorded as unexported
/// and make the struct fail type mapping.
///
/// ```
/// use callbind_abi::{abi_struct, AbiValue, ParamType};
/// use callbind_primitives::{Address, U256};
///
/// abi_struct! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct Withdrawal {
///         pub nonce: U256,
///         pub sender: Address,
///         pub gas_limit: U256,
///     }
/// }
///
/// let ty = Withdrawal::param_type().unwrap();
/// assert_eq!(ty.canonical(), "(uint256,address,uint256)");
/// ```
#[macro_export]
macro_rules! abi_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::AbiValue for $name {
            fn native_type() -> $crate::NativeType {
                $crate::NativeType::Struct($crate::StructType {
                    name: stringify!($name).to_string(),
                    fields: vec![$(
                        $crate::FieldType {
                            name: stringify!($field).to_string(),
                            exported: !stringify!($fvis).is_empty(),
                            ty: <$fty as $crate::AbiValue>::native_type(),
                        },
                    )*],
                })
            }

            fn to_value(&self) -> $crate::Value {
                $crate::Value::Struct(vec![$(
                    (
                        stringify!($field).to_string(),
                        $crate::AbiValue::to_value(&self.$field),
                    ),
                )*])
            }

            fn from_token(
                token: $crate::Token,
                policy: $crate::OverflowPolicy,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let _ = &policy;
                let arity: usize = 0 $(+ { let _ = stringify!($field); 1 })*;
                #[allow(unused_mut, unused_variables)]
                let mut tokens = $crate::TupleTokens::new(token, arity, stringify!($name))?;
                Ok(Self {
                    $( $field: tokens.next(policy)?, )*
                })
            }

            fn from_fields(
                #[allow(unused_mut)] mut fields: $crate::Fields,
                policy: $crate::OverflowPolicy,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let _ = &policy;
                Ok(Self {
                    $( $field: fields.take(&$crate::abi_field_name(stringify!($field)), policy)?, )*
                })
            }
        }
    };
}
