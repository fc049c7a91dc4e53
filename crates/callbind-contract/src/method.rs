//! Bound method descriptions

use callbind_abi::{
    decode_output, encode_function_call, function_selector, function_signature, normalize,
    to_param_type, tokenize, Decoded, DecodeError, EncodeError, FunctionFragment, NativeType,
    ParamType, Value,
};

use crate::error::BindError;

/// A contract method with its types mapped at bind time.
///
/// Immutable once built; calls borrow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name
    pub name: String,
    /// ABI input types in order
    pub inputs: Vec<ParamType>,
    /// ABI output type, `None` for methods returning nothing
    pub output: Option<ParamType>,
    /// Canonical signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// Function selector (4 bytes)
    pub selector: [u8; 4],
    input_types: Vec<NativeType>,
}

impl MethodSpec {
    /// Map a method's declared types.
    ///
    /// Fails if any input or the output has no ABI counterpart.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<NativeType>,
        output: Option<NativeType>,
    ) -> Result<Self, BindError> {
        let name = name.into();
        let map = |ty: &NativeType| {
            to_param_type(ty).map_err(|source| BindError::Type {
                method: name.clone(),
                source,
            })
        };

        let abi_inputs = inputs.iter().map(map).collect::<Result<Vec<_>, _>>()?;
        let abi_output = output.as_ref().map(map).transpose()?;
        let signature = function_signature(&name, &abi_inputs);
        let selector = function_selector(&signature);

        tracing::trace!(
            signature = %signature,
            selector = %hex::encode(selector),
            "mapped method"
        );

        Ok(Self {
            name,
            inputs: abi_inputs,
            output: abi_output,
            signature,
            selector,
            input_types: inputs,
        })
    }

    /// Declared native input types
    pub fn input_types(&self) -> &[NativeType] {
        &self.input_types
    }

    /// Encode call data for the given argument values
    pub fn encode(&self, args: Vec<Value>) -> Result<Vec<u8>, EncodeError> {
        if args.len() != self.inputs.len() {
            return Err(EncodeError::LengthMismatch {
                ty: self.signature.clone(),
                expected: self.inputs.len(),
                got: args.len(),
            });
        }

        let mut tokens = Vec::with_capacity(args.len());
        for ((value, ty), kind) in args.into_iter().zip(&self.input_types).zip(&self.inputs) {
            tokens.push(tokenize(normalize(ty, value)?, kind)?);
        }
        let data = encode_function_call(self.selector, &self.inputs, &tokens)?;
        tracing::trace!(
            method = %self.name,
            selector = %hex::encode(self.selector),
            size = data.len(),
            "encoded call"
        );
        Ok(data)
    }

    /// Decode return data against the output type
    pub fn decode(&self, data: &[u8]) -> Result<Option<Decoded>, DecodeError> {
        decode_output(data, self.output.as_ref())
    }

    /// JSON ABI entry for the method
    pub fn fragment(&self) -> FunctionFragment {
        FunctionFragment::new(&self.name, &self.inputs, self.output.as_ref())
    }
}
