//! Error types for the extender

use thiserror::Error;

/// Main error type for the extender
#[derive(Error, Debug)]
pub enum ExtenderError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request carried no body
    #[error("the request is empty, expecting a pod and a list of nodes!")]
    EmptyRequest,

    /// The request body could not be decoded into extender arguments
    #[error("Decode error: {0}")]
    Decode(String),

    /// A priority function failed to score the nodes
    #[error("Priority {name} failed: {reason}")]
    Priority { name: String, reason: String },

    /// The host priority list could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// Two priority functions were registered under the same name
    #[error("Priority already registered: {0}")]
    DuplicatePriority(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for extender operations
pub type ExtenderResult<T> = Result<T, ExtenderError>;

impl From<toml::de::Error> for ExtenderError {
    fn from(err: toml::de::Error) -> Self {
        ExtenderError::Config(err.to_string())
    }
}
