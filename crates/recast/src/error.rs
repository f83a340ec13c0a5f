use thiserror::Error;

use crate::value::TypeName;

/// Failure from a [`Converter`](crate::Converter) operation.
///
/// Registration failures are cached: once a batch of candidates fails to
/// register, every later call on the same registry reports the same
/// [`InvalidConverter`](ConvertError::InvalidConverter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// A registration candidate violates the converter contract: one
    /// parameter with a single named type, and a single named return type.
    #[error("invalid converter: {reason}")]
    InvalidConverter { reason: String },

    /// Dispatch exhausted the exact, ancestor and interface keys without
    /// finding a registered converter.
    #[error("no converter registered from `{input}` to `{output}`")]
    UnsupportedConversion { input: TypeName, output: TypeName },
}

impl ConvertError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ConvertError::InvalidConverter {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(input: TypeName, output: TypeName) -> Self {
        ConvertError::UnsupportedConversion { input, output }
    }
}
