//! Crate-wide error type

use super::ValidationErrors;

/// Errors raised while building, validating or executing a fetch query.
///
/// Constructor-level problems (blank names, null literals, duplicate
/// columns) surface immediately. Rules that span several fields are only
/// reported by a validation pass and arrive bundled in
/// [`Error::ValidationFailed`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required name was blank or absent.
    #[error("{field} is required")]
    RequiredFieldMissing { field: &'static str },

    /// A value list contained a null entry.
    #[error("{field}[{index}] cannot be null")]
    InvalidValue { field: &'static str, index: usize },

    /// A column equal to an existing one was added to a column set.
    #[error("Column '{name}' is already in the collection")]
    DuplicateEntry { name: String },

    /// A wire token did not name any member of the target enum.
    #[error("Unknown {kind} token '{token}'")]
    UnknownToken { kind: &'static str, token: String },

    /// The query failed validation.
    #[error("Fetch query is not valid: {0}")]
    ValidationFailed(ValidationErrors),

    /// The external executor reported a failure.
    #[error("Executor error: {0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Creates a required field error.
    pub fn required(field: &'static str) -> Self {
        Self::RequiredFieldMissing { field }
    }

    /// Creates an executor error from any error type.
    pub fn executor(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Executor(Box::new(err))
    }

    /// Returns the validation errors if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Fails with [`Error::RequiredFieldMissing`] when `value` is blank.
pub(crate) fn require(value: String, field: &'static str) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(Error::required(field));
    }
    Ok(value)
}
