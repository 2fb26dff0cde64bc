//! XML parsing and serialization errors.

use thiserror::Error;

/// Errors raised while materializing or serializing an [`XmlDocument`](crate::XmlDocument).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    /// The input is not well-formed XML.
    #[error("Malformed XML: {0}")]
    Malformed(String),

    /// The input parsed but holds no root element.
    #[error("XML input has no root element")]
    NoRootElement,

    /// An entity reference that is neither predefined nor a character reference.
    #[error("Unknown XML entity '&{0};'")]
    UnknownEntity(String),

    /// Writing the document back to text failed.
    #[error("XML serialization failed: {0}")]
    Write(String),
}

impl XmlError {
    /// Returns `true` if the error happened while reading input.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_) | Self::NoRootElement | Self::UnknownEntity(_)
        )
    }
}
