//! Error types

mod api;
mod field;
mod validation;

pub use api::*;
pub use field::*;
pub use validation::*;

use crate::source::OperationKind;

/// Top-level error type for crudgrid operations.
///
/// Every failure a data source or the controller can produce collapses into
/// one of these categories. The controller itself never lets an `Error`
/// escape to callers: it stringifies the error into collection state and the
/// event sink, and resolves to a failure sentinel instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured operation set does not provide this capability.
    #[error("{0} operation not supported")]
    Unsupported(OperationKind),

    /// No record with the given identity key exists.
    #[error("record with key '{key}' not found")]
    NotFound {
        /// Display text of the identity key that missed.
        key: String,
    },

    /// HTTP or transport failure from a remote operation set.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Record field access failure.
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl Error {
    /// Creates an unsupported-operation error.
    pub fn unsupported(kind: OperationKind) -> Self {
        Self::Unsupported(kind)
    }

    /// Creates a not-found error from an identity key value.
    pub fn not_found(key: &crate::model::Value) -> Self {
        Self::NotFound {
            key: key.display_text(),
        }
    }

    /// Returns `true` if this error is a missing-capability rejection.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Returns `true` if this error is an identity-key lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
