//! Declared converter signatures and the candidate shapes accepted at
//! registration.
//!
//! Types are captured explicitly at the call site: a candidate carries
//! its declared signature alongside its body, and the registration pass
//! introspects that signature instead of reflecting over the callable.

use std::fmt;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::value::{TypeName, Value};

/// A declared parameter or return type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A single simple named type.
    Named(TypeName),
    /// A union of alternatives. Rejected in converter signatures.
    Union(Vec<TypeExpr>),
    /// No declared type. Rejected in converter signatures.
    Missing,
}

impl TypeExpr {
    pub fn named(name: impl Into<TypeName>) -> Self {
        TypeExpr::Named(name.into())
    }
}

/// The declared shape of a converter: its parameter types and return type.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    params: Vec<TypeExpr>,
    output: TypeExpr,
}

impl Signature {
    pub fn new(params: Vec<TypeExpr>, output: TypeExpr) -> Self {
        Self { params, output }
    }

    /// The well-formed converter shape: one named parameter, one named
    /// return.
    pub fn unary(input: impl Into<TypeName>, output: impl Into<TypeName>) -> Self {
        Self {
            params: vec![TypeExpr::named(input)],
            output: TypeExpr::named(output),
        }
    }

    pub fn params(&self) -> &[TypeExpr] {
        &self.params
    }

    pub fn output(&self) -> &TypeExpr {
        &self.output
    }

    /// Extract the `(input, output)` pair this signature registers under.
    ///
    /// The input is the declared type of the first parameter, the output
    /// the declared return type; both must be single simple named types.
    pub(crate) fn converter_types(&self) -> Result<(TypeName, TypeName), ConvertError> {
        let first = self
            .params
            .first()
            .ok_or_else(|| ConvertError::invalid("signature declares no parameters"))?;
        let input = require_named(first, "parameter")?;
        let output = require_named(&self.output, "return")?;
        Ok((input, output))
    }
}

fn require_named(expr: &TypeExpr, position: &str) -> Result<TypeName, ConvertError> {
    match expr {
        TypeExpr::Named(name) => Ok(name.clone()),
        TypeExpr::Union(_) => Err(ConvertError::invalid(format!(
            "{position} type must be a single named type, found a union"
        ))),
        TypeExpr::Missing => Err(ConvertError::invalid(format!(
            "{position} type is not declared"
        ))),
    }
}

/// Body of a function-shaped converter.
pub type ConverterFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A converter object exposing a single call operator.
///
/// The registration pass introspects [`signature`](Invokable::signature)
/// exactly once; dispatch then goes through
/// [`invoke`](Invokable::invoke).
pub trait Invokable: Send + Sync {
    /// Declared call signature.
    fn signature(&self) -> Signature;

    /// Apply the conversion.
    fn invoke(&self, value: Value) -> Value;
}

/// A raw converter candidate awaiting registration.
pub enum Candidate {
    /// A plain closure with an explicitly declared signature.
    Function {
        signature: Signature,
        body: ConverterFn,
    },
    /// An invokable object; the signature comes from the object itself.
    Object(Box<dyn Invokable>),
}

impl Candidate {
    /// A well-formed closure candidate converting `input` to `output`.
    pub fn function(
        input: impl Into<TypeName>,
        output: impl Into<TypeName>,
        body: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::from_signature(Signature::unary(input, output), body)
    }

    /// A closure candidate with an arbitrary declared signature. The
    /// signature is validated at registration, not here.
    pub fn from_signature(
        signature: Signature,
        body: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Candidate::Function {
            signature,
            body: Arc::new(body),
        }
    }

    /// An invokable-object candidate.
    pub fn invokable(converter: impl Invokable + 'static) -> Self {
        Candidate::Object(Box::new(converter))
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Function { signature, .. } => f
                .debug_struct("Function")
                .field("signature", signature)
                .finish_non_exhaustive(),
            Candidate::Object(object) => f
                .debug_struct("Object")
                .field("signature", &object.signature())
                .finish_non_exhaustive(),
        }
    }
}
