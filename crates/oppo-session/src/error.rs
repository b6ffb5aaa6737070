//! Error types for the session crate.

use oppo_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur while running a protocol session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Protocol-level failure (encoding, registry construction).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// I/O error reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be deserialized.
    #[error("invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration deserialized but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
