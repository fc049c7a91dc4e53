//! Method tables registered at runtime

use callbind_abi::{FunctionFragment, NativeType, Value};

use crate::call::{Call, RawOutput};
use crate::context::BindingContext;
use crate::error::{BindError, CallError};
use crate::method::MethodSpec;

/// Builder for a contract whose methods are known only at runtime
#[derive(Debug, Clone, Default)]
pub struct ContractBuilder {
    methods: Vec<(String, Vec<NativeType>, Option<NativeType>)>,
}

impl ContractBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method
    pub fn method(
        mut self,
        name: &str,
        inputs: Vec<NativeType>,
        output: Option<NativeType>,
    ) -> Self {
        self.methods.push((name.to_string(), inputs, output));
        self
    }

    /// Map every method's types and bind the table to `context`.
    ///
    /// Fails on the first unsupported type or repeated method name.
    pub fn bind(self, context: &BindingContext) -> Result<BoundContract, BindError> {
        let mut methods: Vec<MethodSpec> = Vec::with_capacity(self.methods.len());
        for (name, inputs, output) in self.methods {
            if methods.iter().any(|m| m.name == name) {
                return Err(BindError::DuplicateMethod(name));
            }
            methods.push(MethodSpec::new(name, inputs, output)?);
        }
        tracing::debug!(
            target = %context.target,
            methods = methods.len(),
            "bound contract"
        );
        Ok(BoundContract {
            context: context.clone(),
            methods,
        })
    }
}

/// A contract bound from a runtime method table
#[derive(Debug, Clone)]
pub struct BoundContract {
    context: BindingContext,
    methods: Vec<MethodSpec>,
}

impl BoundContract {
    /// The binding context
    pub fn context(&self) -> &BindingContext {
        &self.context
    }

    /// Get a method by name
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// All bound methods in registration order
    pub fn methods(&self) -> &[MethodSpec] {
        &self.methods
    }

    /// Prepare a call of `name` with already built argument values
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Call<'_, RawOutput>, CallError> {
        let method = self
            .method(name)
            .ok_or_else(|| CallError::UnknownMethod(name.to_string()))?;
        Ok(Call::new(method, &self.context, move || {
            method.encode(args.clone())
        }))
    }

    /// JSON ABI of the bound methods
    pub fn abi(&self) -> Vec<FunctionFragment> {
        self.methods.iter().map(MethodSpec::fragment).collect()
    }
}
