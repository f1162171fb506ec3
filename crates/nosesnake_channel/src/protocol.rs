//! # Broker Wire Protocol
//!
//! One request line, one response line, newline terminated, UTF-8.
//!
//! ```text
//! DECLARE <queue>          -> OK
//! PUBLISH <queue> <token>  -> OK
//! POLL <queue>             -> TOKEN <token> | EMPTY
//! DELETE <queue>           -> OK
//! anything failing         -> ERR <reason>
//! ```
//!
//! Queue names and tokens are single words. `POLL` acknowledges the token it
//! returns; there is no separate ack round trip.

use std::fmt;

use crate::error::{ChannelError, ChannelResult};

/// Reason prefix of the `ERR` line sent for undeclared queues.
pub const UNKNOWN_QUEUE: &str = "unknown-queue";

/// Client to broker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Create the queue if missing.
    Declare(String),
    /// Append a token.
    Publish {
        /// Target queue.
        queue: String,
        /// Token to append.
        token: String,
    },
    /// Take the oldest token.
    Poll(String),
    /// Remove the queue and its pending tokens.
    Delete(String),
}

/// Broker to client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    /// Request applied.
    Ok,
    /// Oldest pending token (now acknowledged).
    Token(String),
    /// Nothing pending.
    Empty,
    /// Request refused.
    Err(String),
}

impl Request {
    /// Parses one request line.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Protocol`] for unknown verbs or wrong arity.
    pub fn parse(line: &str) -> ChannelResult<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["DECLARE", queue] => Ok(Self::Declare((*queue).to_string())),
            ["PUBLISH", queue, token] => Ok(Self::Publish {
                queue: (*queue).to_string(),
                token: (*token).to_string(),
            }),
            ["POLL", queue] => Ok(Self::Poll((*queue).to_string())),
            ["DELETE", queue] => Ok(Self::Delete((*queue).to_string())),
            _ => Err(ChannelError::Protocol(format!("bad request {:?}", line.trim_end()))),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declare(queue) => write!(f, "DECLARE {queue}"),
            Self::Publish { queue, token } => write!(f, "PUBLISH {queue} {token}"),
            Self::Poll(queue) => write!(f, "POLL {queue}"),
            Self::Delete(queue) => write!(f, "DELETE {queue}"),
        }
    }
}

impl Response {
    /// Parses one response line.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Protocol`] for anything that is not a response.
    pub fn parse(line: &str) -> ChannelResult<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (line, None),
        };
        match (verb, rest) {
            ("OK", None) => Ok(Self::Ok),
            ("EMPTY", None) => Ok(Self::Empty),
            ("TOKEN", Some(token)) if !token.is_empty() && !token.contains(' ') => {
                Ok(Self::Token(token.to_string()))
            }
            ("ERR", reason) => Ok(Self::Err(reason.unwrap_or_default().to_string())),
            _ => Err(ChannelError::Protocol(format!("bad response {line:?}"))),
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Token(token) => write!(f, "TOKEN {token}"),
            Self::Empty => f.write_str("EMPTY"),
            Self::Err(reason) => write!(f, "ERR {reason}"),
        }
    }
}
