//! Errors raised while loading a model.

use thiserror::Error;

/// Errors that can occur while loading or assembling a [`Model`](crate::Model).
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to read the model file
    #[error("Failed to read model file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The JSON input is not a valid model
    #[error("Invalid JSON model: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML input is not a valid model
    #[error("Invalid YAML model: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The model file extension is neither JSON nor YAML
    #[error("Unsupported model format '{0}', expected .json, .yaml or .yml")]
    UnsupportedFormat(String),

    /// Two structs share a name
    #[error("Struct '{0}' is declared more than once")]
    DuplicateStruct(String),

    /// Two attributes of one struct share a raw name
    #[error("Attribute '{attribute}' is declared more than once in struct '{struct_name}'")]
    DuplicateAttribute {
        struct_name: String,
        attribute: String,
    },
}
