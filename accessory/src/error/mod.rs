//! Error types raised by generated accessors.

mod accessor_error;
mod xml_error;

pub use accessor_error::AccessorError;
pub use xml_error::XmlError;
