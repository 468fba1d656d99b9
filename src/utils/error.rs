use thiserror::Error;

/// Errors produced by the enrichment and blocking pipelines
#[derive(Error, Debug)]
pub enum IntelError {
    /// The IP string failed the syntactic check; no network call was made
    #[error("Invalid IP address: {0}")]
    InvalidFormat(String),

    /// DNS, TCP, TLS or timeout failure talking to a remote service
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote service answered with a non-success status or `success: false`
    #[error("Service error ({status}): {body}")]
    Service { status: u16, body: String },

    /// The payload did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No remote list matches the configured name
    #[error("List '{0}' not found")]
    NotFound(String),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Unusable process input (alert payload, arguments)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for pipeline operations
pub type IntelResult<T> = Result<T, IntelError>;

impl IntelError {
    /// HTTP status carried by a service error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            IntelError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for IntelError {
    fn from(err: reqwest::Error) -> Self {
        IntelError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for IntelError {
    fn from(err: std::io::Error) -> Self {
        IntelError::Internal(err.to_string())
    }
}
