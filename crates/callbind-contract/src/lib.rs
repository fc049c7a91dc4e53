//! # callbind-contract
//!
//! Contract bindings over the callbind codec.
//!
//! A method table is bound once to a [`BindingContext`]: every declared type
//! is mapped to its ABI type up front, so a malformed table fails at bind time
//! rather than on first use. Each invocation then yields a [`Call`], which
//! encodes lazily and is evaluated against a [`Backend`].
//!
//! - [`contract_bindings!`]: typed bindings declared in Rust
//! - [`ContractBuilder`]: method tables assembled at runtime
//! - [`MockBackend`]: canned responses for tests

#![warn(missing_docs)]
#![warn(clippy::all)]

mod backend;
mod builder;
mod call;
mod context;
mod error;
mod macros;
mod method;

pub use backend::{Backend, MockBackend, Receipt, RecordedCall, TxOptions};
pub use builder::{BoundContract, ContractBuilder};
pub use call::{Call, RawOutput};
pub use context::BindingContext;
pub use error::{BackendError, BindError, CallError};
pub use method::MethodSpec;

#[doc(hidden)]
pub mod __private {
    pub use callbind_abi::{abi_field_name, AbiOutput, AbiValue, FunctionFragment};

    use crate::BindingContext;

    /// Log a binding built by `contract_bindings!`
    pub fn log_bound(name: &str, context: &BindingContext, methods: usize) {
        tracing::debug!(
            contract = name,
            target = %context.target,
            methods,
            "bound contract"
        );
    }
}
