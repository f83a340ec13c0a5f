//! The public conversion registry and dispatcher.

use std::fmt;
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing::trace;

use crate::error::ConvertError;
use crate::graph::TypeGraph;
use crate::registry::{ConverterMap, candidate_keys, register_all};
use crate::signature::Candidate;
use crate::value::{TypeName, Value};

/// Registry and dispatcher for type-directed value conversions.
///
/// Built from raw [`Candidate`]s and an optional [`TypeGraph`]. The
/// candidates are registered lazily, on the first public call, and
/// exactly once: concurrent first calls block until the single
/// registration pass completes. After that the converter map is fixed
/// for the registry's lifetime; dispatch and availability checks never
/// mutate it.
///
/// Each registry is an independent instance: converters registered here
/// are owned by this registry alone, and nothing is shared process-wide.
pub struct Converter {
    graph: TypeGraph,
    pending: Mutex<Option<Vec<Candidate>>>,
    registered: OnceCell<Result<ConverterMap, ConvertError>>,
}

impl Converter {
    /// A registry over the given candidates, with no class hierarchy:
    /// dispatch falls back on exact type matches only.
    pub fn new(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        Self::with_types(candidates, TypeGraph::new())
    }

    /// A registry whose hierarchy fallback consults `graph`.
    pub fn with_types(candidates: impl IntoIterator<Item = Candidate>, graph: TypeGraph) -> Self {
        Self {
            graph,
            pending: Mutex::new(Some(candidates.into_iter().collect())),
            registered: OnceCell::new(),
        }
    }

    pub fn type_graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Convert `value` to the type named by `output`.
    ///
    /// An object value that already satisfies `output` is returned
    /// unchanged without invoking any converter. Otherwise the value's
    /// runtime type is resolved against the registered converters
    /// (exact match first, then ancestors, then interfaces) and the
    /// first match is invoked with the value.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidConverter`] if the registration pass
    /// failed, [`ConvertError::UnsupportedConversion`] if no candidate
    /// key matches.
    pub fn convert(
        &self,
        output: impl Into<TypeName>,
        value: Value,
    ) -> Result<Value, ConvertError> {
        self.convert_to(output.into(), value)
    }

    /// Callable-style invocation; identical semantics to
    /// [`convert`](Converter::convert).
    pub fn call(&self, output: impl Into<TypeName>, value: Value) -> Result<Value, ConvertError> {
        self.convert_to(output.into(), value)
    }

    #[tracing::instrument(
        name = "recast.convert",
        level = "trace",
        skip(self, value),
        fields(output = %output)
    )]
    fn convert_to(&self, output: TypeName, value: Value) -> Result<Value, ConvertError> {
        let converters = self.ensure_registered()?;

        // Nothing to do when the value already satisfies the target.
        if let Value::Object(object) = &value
            && self.graph.is_instance(object.class(), &output)
        {
            trace!("value already satisfies the target type");
            return Ok(value);
        }

        let input = value.type_name();
        for key in candidate_keys(&self.graph, &input, &output) {
            if let Some(converter) = converters.get(&key) {
                trace!(key = %key, "dispatching converter");
                return Ok(converter.invoke(value));
            }
        }

        trace!(input = %input, "no converter matched");
        Err(ConvertError::unsupported(input, output))
    }

    /// A unary function converting values to `output`, closed over this
    /// registry.
    ///
    /// Binding performs no registration and no validation; both happen
    /// when the returned function is first called, so a registration
    /// failure surfaces there rather than here.
    pub fn bind(
        &self,
        output: impl Into<TypeName>,
    ) -> impl Fn(Value) -> Result<Value, ConvertError> + '_ {
        let output = output.into();
        move |value| self.convert_to(output.clone(), value)
    }

    /// Whether a converter would answer a conversion from `input` to
    /// `output`, without invoking one. Unlike
    /// [`convert`](Converter::convert), the input type is named by the
    /// caller rather than derived from a value.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidConverter`] if the registration pass
    /// failed.
    pub fn is_available(
        &self,
        input: impl Into<TypeName>,
        output: impl Into<TypeName>,
    ) -> Result<bool, ConvertError> {
        self.available_between(input.into(), output.into())
    }

    #[tracing::instrument(
        name = "recast.available",
        level = "trace",
        skip(self),
        fields(input = %input, output = %output)
    )]
    fn available_between(&self, input: TypeName, output: TypeName) -> Result<bool, ConvertError> {
        let converters = self.ensure_registered()?;
        let available =
            candidate_keys(&self.graph, &input, &output).any(|key| converters.contains_key(&key));
        trace!(available, "availability probe complete");
        Ok(available)
    }

    /// Runs the registration pass on first use; afterwards returns the
    /// fixed map, or the cached failure that poisoned the batch.
    fn ensure_registered(&self) -> Result<&ConverterMap, ConvertError> {
        let registered = self.registered.get_or_init(|| {
            let pending = self
                .pending
                .lock()
                .expect("pending converter lock poisoned")
                .take()
                .unwrap_or_default();
            register_all(pending)
        });
        registered.as_ref().map_err(Clone::clone)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Converter");
        match self.registered.get() {
            Some(Ok(converters)) => debug.field("registered", &converters.len()),
            Some(Err(error)) => debug.field("failed", error),
            None => debug.field("pending", &true),
        };
        debug.finish_non_exhaustive()
    }
}
