//! Error types for kindview

use thiserror::Error;

/// Core error type for kindview operations
#[derive(Error, Debug)]
pub enum KindviewError {
    /// Filter text that does not match `name OP TYPE(value)`.
    #[error("Cannot parse filter: {input}")]
    Parse { input: String },

    /// The outer encoded-state document could not be read.
    #[error("Cannot decode query state: {0}")]
    Decode(String),

    /// The server answered with a success status and an embedded error message.
    #[error("{0}")]
    LogicalQuery(String),

    #[error("Request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// 403 carrying a login redirect.
    #[error("Authentication required, log in at {redirect_url}")]
    AuthRequired { redirect_url: String },

    /// A success status whose body is not what the endpoint promises.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KindviewError {
    /// Failures that surface as a generic "request failed" notification.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            KindviewError::Remote { .. }
                | KindviewError::InvalidResponse(_)
                | KindviewError::Timeout(_)
                | KindviewError::Transport(_)
        )
    }

    /// Errors raised while reading filter text or an encoded state.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, KindviewError::Parse { .. } | KindviewError::Decode(_))
    }
}

/// Result type alias for kindview operations
pub type Result<T> = std::result::Result<T, KindviewError>;
