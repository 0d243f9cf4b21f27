//! Error types for manifest loading and building.

use sizer_layout::LayoutError;
use thiserror::Error;

/// Error type for manifest loading and building.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Reading the manifest file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tree rejected an operation
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// A cell names an object slot the caller did not provide
    #[error("unknown object slot '{0}'")]
    UnknownObject(String),

    /// A cell or the root names a container the manifest does not define
    #[error("unknown container '{0}'")]
    UnknownContainer(String),

    /// Invalid value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field path
        field: String,
        /// Error message
        message: String,
    },

    /// A cell has no payload, or more than one
    #[error("cell {index} of '{container}' must have exactly one of spacer, object or container")]
    MissingPayload {
        /// Container name
        container: String,
        /// Cell position
        index: usize,
    },
}

impl ManifestError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.to_string(),
        }
    }
}
