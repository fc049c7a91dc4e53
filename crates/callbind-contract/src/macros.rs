//! Typed binding generation

/// Declare a typed binding for a contract.
///
/// Each `fn` entry becomes a method returning a [`Call`](crate::Call) over its
/// arguments. The ABI method name is the lowerCamelCase form of the Rust name
/// unless given in brackets. All types are mapped once, in `bind`, which fails
/// if any of them has no ABI counterpart.
///
/// ```
/// use callbind_contract::{contract_bindings, BindingContext};
/// use callbind_primitives::{Address, Uint128, U256};
///
/// contract_bindings! {
///     #[derive(Debug, Clone)]
///     pub struct DisputeGameFactory {
///         fn game_count() -> U256;
///         fn get_required_bond(amount: Option<Uint128>) -> U256;
///         fn init_bonds["initBonds"](game_type: u32, bond: U256);
///     }
/// }
///
/// let factory = DisputeGameFactory::bind(&BindingContext::new(Address::ZERO)).unwrap();
/// let data = factory.get_required_bond(Some(Uint128(1337))).calldata().unwrap();
/// assert_eq!(hex::encode(&data[..4]), "c395e1ca");
/// ```
///
/// The generated type reserves `bind`, `context`, `methods` and `abi`. An
/// entry with one of these names does not compile:
///
/// ```compile_fail
/// use callbind_contract::contract_bindings;
/// use callbind_primitives::U256;
///
/// contract_bindings! {
///     pub struct Registry {
///         fn methods() -> U256;
///     }
/// }
/// ```
///
/// Bind such a method under another Rust name instead:
///
/// ```
/// use callbind_contract::{contract_bindings, BindingContext};
/// use callbind_primitives::{Address, U256};
///
/// contract_bindings! {
///     pub struct Registry {
///         fn method_count["methods"]() -> U256;
///         fn bound_context["context"]() -> U256;
///     }
/// }
///
/// let registry = Registry::bind(&BindingContext::new(Address::ZERO)).unwrap();
/// assert_eq!(registry.method_count().method().signature, "methods()");
/// assert_eq!(registry.bound_context().method().signature, "context()");
/// ```
#[macro_export]
macro_rules! contract_bindings {
    (@name $method:ident) => {
        $crate::__private::abi_field_name(stringify!($method))
    };
    (@name $method:ident $abi:literal) => {
        ::std::string::String::from($abi)
    };
    (@output) => {
        ::std::option::Option::None
    };
    (@output $ret:ty) => {
        <$ret as $crate::__private::AbiOutput>::output_type()
    };
    (@ret) => { () };
    (@ret $ret:ty) => { $ret };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$mmeta:meta])*
                fn $method:ident $([$abi:literal])? (
                    $($arg:ident : $aty:ty),* $(,)?
                ) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            context: $crate::BindingContext,
            $( $method: $crate::MethodSpec, )*
        }

        impl $name {
            /// Map every method's types and bind them to `context`
            pub fn bind(
                context: &$crate::BindingContext,
            ) -> ::std::result::Result<Self, $crate::BindError> {
                let bound = Self {
                    context: context.clone(),
                    $(
                        $method: $crate::MethodSpec::new(
                            $crate::contract_bindings!(@name $method $($abi)?),
                            vec![$(<$aty as $crate::__private::AbiValue>::native_type()),*],
                            $crate::contract_bindings!(@output $($ret)?),
                        )?,
                    )*
                };
                $crate::__private::log_bound(stringify!($name), &bound.context, bound.methods().len());
                Ok(bound)
            }

            /// The binding context
            pub fn context(&self) -> &$crate::BindingContext {
                &self.context
            }

            /// All bound methods in declaration order
            pub fn methods(&self) -> ::std::vec::Vec<&$crate::MethodSpec> {
                vec![$(&self.$method),*]
            }

            /// JSON ABI of the bound methods
            pub fn abi(&self) -> ::std::vec::Vec<$crate::__private::FunctionFragment> {
                vec![$(self.$method.fragment()),*]
            }

            $(
                $(#[$mmeta])*
                pub fn $method(
                    &self,
                    $($arg: $aty),*
                ) -> $crate::Call<'_, $crate::contract_bindings!(@ret $($ret)?)> {
                    let method = &self.$method;
                    $crate::Call::new(method, &self.context, move || {
                        method.encode(vec![$($crate::__private::AbiValue::to_value(&$arg)),*])
                    })
                }
            )*
        }
    };
}
