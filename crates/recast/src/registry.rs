//! Converter storage and candidate-key resolution.

use std::fmt;
use std::iter;
use std::sync::Arc;

use either::Either;
use indexmap::IndexMap;
use tracing::debug;

use crate::error::ConvertError;
use crate::graph::TypeGraph;
use crate::signature::{Candidate, ConverterFn, Invokable};
use crate::value::{TypeName, Value};

/// Exact lookup key for a registered conversion: `input=>output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConverterKey(String);

impl ConverterKey {
    pub fn new(input: &TypeName, output: &TypeName) -> Self {
        Self(format!("{input}=>{output}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConverterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A converter after registration, keeping its original shape.
pub(crate) enum RegisteredConverter {
    Function(ConverterFn),
    Object(Arc<dyn Invokable>),
}

impl RegisteredConverter {
    pub(crate) fn invoke(&self, value: Value) -> Value {
        match self {
            RegisteredConverter::Function(body) => body(value),
            RegisteredConverter::Object(object) => object.invoke(value),
        }
    }
}

impl fmt::Debug for RegisteredConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisteredConverter::Function(_) => f.write_str("Function"),
            RegisteredConverter::Object(_) => f.write_str("Object"),
        }
    }
}

pub(crate) type ConverterMap = IndexMap<ConverterKey, RegisteredConverter>;

/// Consume raw candidates in order, keying each by its declared
/// signature. Registering a second converter under an identical key
/// overwrites the first; the first invalid candidate aborts the whole
/// pass.
#[tracing::instrument(
    name = "recast.registry.register",
    level = "debug",
    skip(candidates),
    fields(candidates = candidates.len())
)]
pub(crate) fn register_all(candidates: Vec<Candidate>) -> Result<ConverterMap, ConvertError> {
    let mut converters = ConverterMap::new();
    for candidate in candidates {
        let (signature, registered) = match candidate {
            Candidate::Function { signature, body } => {
                (signature, RegisteredConverter::Function(body))
            }
            Candidate::Object(object) => {
                let signature = object.signature();
                (signature, RegisteredConverter::Object(Arc::from(object)))
            }
        };
        let (input, output) = signature.converter_types()?;
        let key = ConverterKey::new(&input, &output);
        debug!(key = %key, "converter registered");
        converters.insert(key, registered);
    }
    Ok(converters)
}

/// Ordered lookup keys for resolving `input` to `output`.
///
/// The exact pair always comes first. A primitive category or a name the
/// graph does not know stops there; otherwise the input's ancestors
/// follow (most-derived first), then its interfaces, each paired with
/// `output`. The most specific registered converter therefore always
/// wins.
pub fn candidate_keys<'a>(
    graph: &'a TypeGraph,
    input: &'a TypeName,
    output: &'a TypeName,
) -> impl Iterator<Item = ConverterKey> + 'a {
    let exact = iter::once(ConverterKey::new(input, output));
    if input.is_primitive() || !graph.contains(input) {
        return Either::Left(exact);
    }

    let hierarchy = graph
        .ancestors(input)
        .into_iter()
        .chain(graph.interfaces_of(input));
    Either::Right(exact.chain(hierarchy.map(move |variation| ConverterKey::new(&variation, output))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeDecl;

    fn keys(graph: &TypeGraph, input: &str, output: &str) -> Vec<String> {
        candidate_keys(graph, &input.to_owned().into(), &output.to_owned().into())
            .map(|key| key.as_str().to_owned())
            .collect()
    }

    #[test]
    fn key_format_joins_input_and_output() {
        let key = ConverterKey::new(&"string".into(), &"int".into());
        assert_eq!(key.as_str(), "string=>int");
    }

    #[test]
    fn primitive_inputs_yield_only_the_exact_key() {
        let graph = TypeGraph::from_iter([TypeDecl::class("Invoice")]);
        assert_eq!(keys(&graph, "string", "int"), vec!["string=>int"]);
    }

    #[test]
    fn unknown_names_yield_only_the_exact_key() {
        let graph = TypeGraph::new();
        assert_eq!(keys(&graph, "Ghost", "string"), vec!["Ghost=>string"]);
    }

    #[test]
    fn class_inputs_walk_exact_then_ancestors_then_interfaces() {
        let graph = TypeGraph::from_iter([
            TypeDecl::interface("Printable"),
            TypeDecl::class("Document").implements(["Printable"]),
            TypeDecl::class("Report").extends("Document"),
        ]);
        assert_eq!(
            keys(&graph, "Report", "string"),
            vec![
                "Report=>string",
                "Document=>string",
                "Printable=>string",
            ]
        );
    }

    #[test]
    fn duplicate_keys_keep_the_last_registration() {
        let candidates = vec![
            Candidate::function("string", "int", |_| Value::Int(1)),
            Candidate::function("string", "int", |_| Value::Int(2)),
        ];
        let converters = register_all(candidates).unwrap();
        assert_eq!(converters.len(), 1);
        let key = ConverterKey::new(&"string".into(), &"int".into());
        assert_eq!(converters[&key].invoke(Value::from("x")), Value::Int(2));
    }

    #[test]
    fn first_invalid_candidate_aborts_the_pass() {
        use crate::signature::{Signature, TypeExpr};

        let candidates = vec![
            Candidate::function("string", "int", |_| Value::Int(1)),
            Candidate::from_signature(Signature::new(vec![], TypeExpr::named("int")), |value| {
                value
            }),
        ];
        let err = register_all(candidates).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConverter { .. }));
    }
}
