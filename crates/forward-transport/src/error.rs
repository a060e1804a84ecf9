//! Transport error types.

use thiserror::Error;

/// A specialized `Result` type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Represents errors that can occur during transport operations.
///
/// Transport failures are surfaced verbatim from the underlying boundary
/// with no classification or retry: an authentication rejection and an
/// unreachable host both arrive as [`TransportError::ConnectionFailed`].
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum TransportError {
    /// Failed to establish a connection.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An established connection became unusable.
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Failed to send a message.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// The read loop terminated with a fatal error.
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Failed to serialize an outbound message.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The underlying close handshake reported an error.
    #[error("Close failed: {0}")]
    CloseFailed(String),

    /// The connection was configured with invalid parameters.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A send or listen was attempted with no session established.
    #[error("No active session")]
    NoActiveSession,
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::ConnectionLost(err.to_string())
    }
}
