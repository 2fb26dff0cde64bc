//! Error types for the accessory generator.

use accessory_define::ModelError;
use thiserror::Error;

/// Errors that can occur during planning and code generation.
///
/// Attribute-scoped variants always carry the struct and attribute names so
/// a failure report can point at the offending declaration.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The declared type is neither a base type, a restriction, a known
    /// struct nor a union.
    #[error("Cannot resolve type '{type_name}' of attribute '{attribute}' in struct '{struct_name}'")]
    UnresolvedType {
        struct_name: String,
        attribute: String,
        type_name: String,
    },

    /// The attribute references a restriction the model does not declare.
    #[error("Attribute '{attribute}' in struct '{struct_name}' references unknown restriction '{restriction}'")]
    UnknownRestriction {
        struct_name: String,
        attribute: String,
        restriction: String,
    },

    /// A pattern facet does not compile as a regular expression.
    #[error("Invalid pattern '{pattern}' on attribute '{attribute}' in struct '{struct_name}': {reason}")]
    InvalidPattern {
        struct_name: String,
        attribute: String,
        pattern: String,
        reason: String,
    },

    /// An XML attribute also references an enumeration restriction.
    #[error("Attribute '{attribute}' in struct '{struct_name}' cannot be both XML and restricted by '{restriction}'")]
    XmlRestrictionConflict {
        struct_name: String,
        attribute: String,
        restriction: String,
    },

    /// An array attribute declares a default that is not a sequence.
    #[error("Array attribute '{attribute}' in struct '{struct_name}' declares a non-sequence default")]
    ArrayDefault {
        struct_name: String,
        attribute: String,
    },

    /// Failed to load or parse the model
    #[error("Failed to load model: {0}")]
    ParseError(#[from] ModelError),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// One or more structs could not be planned
    #[error("{failed} of {total} structs failed to plan")]
    PlanningFailed { failed: usize, total: usize },
}

impl GeneratorError {
    /// Struct and attribute the error is scoped to, if any.
    pub fn scope(&self) -> Option<(&str, &str)> {
        match self {
            Self::UnresolvedType {
                struct_name,
                attribute,
                ..
            }
            | Self::UnknownRestriction {
                struct_name,
                attribute,
                ..
            }
            | Self::InvalidPattern {
                struct_name,
                attribute,
                ..
            }
            | Self::XmlRestrictionConflict {
                struct_name,
                attribute,
                ..
            }
            | Self::ArrayDefault {
                struct_name,
                attribute,
            } => Some((struct_name.as_str(), attribute.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_errors_name_struct_and_attribute() {
        let err = GeneratorError::UnresolvedType {
            struct_name: "Person".to_string(),
            attribute: "age".to_string(),
            type_name: "Years".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Person") && msg.contains("age") && msg.contains("Years"), "got: {msg}");
        assert_eq!(err.scope(), Some(("Person", "age")));
    }

    #[test]
    fn config_errors_have_no_scope() {
        let err = GeneratorError::ConfigError("bad prefix".to_string());
        assert_eq!(err.scope(), None);
    }
}
