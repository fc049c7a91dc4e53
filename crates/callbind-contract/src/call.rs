//! Deferred contract calls

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use callbind_abi::{AbiOutput, Decoded, EncodeError, Token};
use callbind_primitives::Address;

use crate::backend::{Receipt, TxOptions};
use crate::context::BindingContext;
use crate::error::CallError;
use crate::method::MethodSpec;

type EncodeFn<'a> = Box<dyn Fn() -> Result<Vec<u8>, EncodeError> + Send + Sync + 'a>;

/// One invocation of a bound method.
///
/// Holds the method, the context and a deferred encoder over the arguments.
/// Nothing is encoded until the call is evaluated with [`read`](Call::read)
/// or [`write`](Call::write), or its [`calldata`](Call::calldata) is asked for.
pub struct Call<'a, R> {
    method: &'a MethodSpec,
    context: &'a BindingContext,
    encode: EncodeFn<'a>,
    _output: PhantomData<fn() -> R>,
}

impl<'a, R: AbiOutput> Call<'a, R> {
    /// Create a call; `encode` produces the full call data
    pub fn new(
        method: &'a MethodSpec,
        context: &'a BindingContext,
        encode: impl Fn() -> Result<Vec<u8>, EncodeError> + Send + Sync + 'a,
    ) -> Self {
        Self {
            method,
            context,
            encode: Box::new(encode),
            _output: PhantomData,
        }
    }

    /// The method being called
    pub fn method(&self) -> &'a MethodSpec {
        self.method
    }

    /// Contract address
    pub fn target(&self) -> Address {
        self.context.target
    }

    /// Encode the call data
    pub fn calldata(&self) -> Result<Bytes, CallError> {
        Ok(Bytes::from((self.encode)()?))
    }

    /// Decode return data into the output type
    pub fn decode(&self, data: &[u8]) -> Result<R, CallError> {
        let decoded = self.method.decode(data)?;
        Ok(R::from_output(decoded, self.context.config.overflow)?)
    }

    /// Execute as a read-only call and decode the result
    pub async fn read(self) -> Result<R, CallError> {
        let data = self.calldata()?;
        let backend = self.context.backend()?;
        let raw = backend.call(self.context.target, data).await?;
        self.decode(&raw)
    }

    /// Submit as a transaction
    pub async fn write(self, opts: &TxOptions) -> Result<Receipt, CallError> {
        let data = self.calldata()?;
        let backend = self.context.backend()?;
        tracing::debug!(
            method = %self.method.signature,
            target = %self.context.target,
            "submitting transaction"
        );
        Ok(backend.send(self.context.target, data, opts).await?)
    }
}

impl<R> fmt::Debug for Call<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("method", &self.method.signature)
            .field("target", &self.context.target)
            .finish()
    }
}

/// Output of an untyped call: the decoded return data as is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput(pub Option<Decoded>);

impl RawOutput {
    /// The output as a single token, `None` for methods returning nothing
    pub fn into_token(self) -> Option<Token> {
        self.0.map(Decoded::into_token)
    }
}

impl AbiOutput for RawOutput {
    fn output_type() -> Option<callbind_abi::NativeType> {
        None
    }

    fn from_output(
        decoded: Option<Decoded>,
        _policy: callbind_abi::OverflowPolicy,
    ) -> Result<Self, callbind_abi::DecodeError> {
        Ok(RawOutput(decoded))
    }
}
