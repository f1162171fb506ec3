//! # Channel Error Types
//!
//! Every variant except [`ChannelError::InvalidToken`] means the channel is
//! gone. Owners treat them as fatal and exit; there is no retry.

use thiserror::Error;

/// Errors raised by command channel operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Could not reach the broker at startup.
    #[error("cannot connect to broker at {addr}: {reason}")]
    ConnectionFailed {
        /// Broker address.
        addr: String,
        /// OS error text.
        reason: String,
    },

    /// The broker connection dropped or timed out.
    #[error("broker connection lost: {0}")]
    ConnectionLost(String),

    /// The queue was released (or never declared).
    #[error("queue not found: {0}")]
    UnknownQueue(String),

    /// The broker refused the request.
    #[error("broker rejected request: {0}")]
    Rejected(String),

    /// Malformed request or response line.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// Token cannot be carried on the wire (empty or contains whitespace).
    #[error("invalid token: {0:?}")]
    InvalidToken(String),
}

impl From<std::io::Error> for ChannelError {
    fn from(e: std::io::Error) -> Self {
        Self::ConnectionLost(e.to_string())
    }
}

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;
