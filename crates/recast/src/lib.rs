//! recast: a type-directed value-conversion registry.
//!
//! Given a runtime [`Value`] and a target type name, the registry picks
//! and invokes a previously registered conversion function, falling back
//! through the input's declared supertype/interface chain when no exact
//! converter exists. Converters are supplied at construction as
//! [`Candidate`]s (closures with explicit signatures, or objects
//! implementing [`Invokable`]) and registered lazily on the first call.
//!
//! # Usage
//!
//! ```
//! use recast::{Candidate, Converter, Value};
//!
//! let converter = Converter::new([
//!     Candidate::function("string", "int", |value| {
//!         Value::Int(value.as_str().and_then(|s| s.parse().ok()).unwrap_or(0))
//!     }),
//! ]);
//!
//! assert_eq!(converter.convert("int", Value::from("42"))?, Value::Int(42));
//! assert!(converter.is_available("string", "int")?);
//! # Ok::<(), recast::ConvertError>(())
//! ```
//!
//! Hierarchy-aware fallback goes through an explicit [`TypeGraph`]:
//!
//! ```
//! use recast::{Candidate, Converter, TypeDecl, TypeGraph, Value};
//!
//! let graph = TypeGraph::from_iter([
//!     TypeDecl::class("Document"),
//!     TypeDecl::class("Report").extends("Document"),
//! ]);
//! let converter = Converter::with_types(
//!     [Candidate::function("Document", "string", |_| Value::from("doc"))],
//!     graph,
//! );
//!
//! // No Report=>string converter; the Document=>string one answers.
//! let report = Value::object("Report", [("pages", Value::Int(2))]);
//! assert_eq!(converter.convert("string", report)?, Value::from("doc"));
//! # Ok::<(), recast::ConvertError>(())
//! ```

mod converter;
mod error;
mod graph;
mod registry;
mod signature;
mod value;

pub use converter::Converter;
pub use error::ConvertError;
pub use graph::{TypeDecl, TypeGraph, TypeKind};
pub use registry::{ConverterKey, candidate_keys};
pub use signature::{Candidate, ConverterFn, Invokable, Signature, TypeExpr};
pub use value::{Object, TypeName, Value};
