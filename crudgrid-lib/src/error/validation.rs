//! Form validation error types

/// Error information for a single form field that failed validation.
///
/// Validation happens entirely in the presentation layer: a failing
/// [`FormModel`](crate::model::FormModel) never reaches the controller, so
/// these errors are reported to the user directly instead of flowing through
/// the operation error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Human-readable validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates the standard required-field error for a column label.
    pub fn required(field: impl Into<String>, label: &str) -> Self {
        Self {
            field: field.into(),
            message: format!("{} is required", label),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
