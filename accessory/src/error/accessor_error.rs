//! Errors raised by generated accessor methods.

use thiserror::Error;

/// Errors returned by generated getters, setters and add-to methods.
///
/// `InvalidArgument` is the only variant produced by validation guards. It
/// is recoverable by the caller: the guard runs before any assignment, so
/// the instance is left untouched.
///
/// ## Examples
///
/// ```rust
/// use accessory::AccessorError;
///
/// let err = AccessorError::invalid_argument("Invalid value 'x', please provide a numeric value, string given");
/// assert!(err.is_invalid_argument());
/// assert!(err.to_string().contains("'x'"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    /// A validation guard rejected the supplied value.
    #[error("{message}")]
    InvalidArgument {
        /// Message naming the offending value, its type and the expectation.
        message: String,
    },

    /// A non-removable field was read before it ever held a value.
    #[error("Field '{field}' has no value")]
    UnsetField {
        /// Clean name of the field.
        field: String,
    },

    /// An item was appended to a field that holds something other than a sequence.
    #[error("Field '{field}' does not hold a sequence, cannot append an item")]
    NotASequence {
        /// Clean name of the field.
        field: String,
    },
}

impl AccessorError {
    /// Creates an `InvalidArgument` error from a guard message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns `true` if this error was raised by a validation guard.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
