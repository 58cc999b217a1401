//! Error types for runtime (data-shape) failures
//!
//! Structural problems (a type that is not a plain aggregate, a field type
//! outside the storage-safe set) are compile errors and never show up here.
//! What remains are conditions reachable from external data.

use crate::value::StorageKind;

/// Result type for structcast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable data-shape errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Sequence length differs from the aggregate's arity
    #[error("Aggregate '{aggregate}' expects {expected} fields, got {got}")]
    ArityMismatch {
        /// Aggregate type name
        aggregate: &'static str,
        /// Arity of the aggregate
        expected: usize,
        /// Length of the supplied sequence
        got: usize,
    },

    /// Storage value tag doesn't match the requested native type
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Kind the native type decodes from
        expected: StorageKind,
        /// Physical kind of the supplied value
        got: StorageKind,
    },

    /// Text is not the storage text form of the requested kind
    #[error("Invalid {kind} text: {text:?}")]
    InvalidText {
        /// Kind being parsed
        kind: StorageKind,
        /// Offending text
        text: String,
    },

    /// Millisecond count outside the representable timestamp range
    #[error("Timestamp out of range: {0} ms")]
    TimestampOutOfRange(i64),

    /// Decoding a specific field failed
    #[error("Field {index} ({name}): {source}")]
    Field {
        /// Field position in declaration order
        index: usize,
        /// Declared field name
        name: &'static str,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Strip `Field` wrappers and return the underlying error.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
