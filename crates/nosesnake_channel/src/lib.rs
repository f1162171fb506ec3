//! # NOSESNAKE Channel
//!
//! The named command slot shared by the tracker and the game.
//!
//! ## Contract
//!
//! | Operation  | Blocking | Behaviour                                        |
//! |------------|----------|--------------------------------------------------|
//! | `create`   | yes      | Idempotent declaration, safe from both ends      |
//! | `publish`  | no       | Appends a token, FIFO, fire-and-forget           |
//! | `poll`     | no       | Removes and acknowledges at most one token       |
//! | `release`  | no       | Deletes the queue; the other end must be done    |
//!
//! Polling an empty queue returns `Ok(None)`, never an error. Any error from
//! the broker transport is fatal to the caller.
//!
//! ## Implementations
//!
//! - [`MemoryChannel`]: in-process, backed by crossbeam channels.
//! - [`BrokerChannel`]: TCP client for the [`Broker`] process.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod broker;
pub mod client;
pub mod error;
pub mod memory;
pub mod protocol;

pub use broker::{Broker, QueueTable};
pub use client::BrokerChannel;
pub use error::{ChannelError, ChannelResult};
pub use memory::{MemoryChannel, MemoryHub};
pub use protocol::{Request, Response};

use nosesnake_shared::DirectionCommand;

/// One end of a named command queue.
pub trait CommandChannel {
    /// Queue name.
    fn name(&self) -> &str;

    /// Appends a token. Never waits for the consumer.
    ///
    /// # Errors
    ///
    /// [`ChannelError::InvalidToken`] for tokens that cannot travel on the
    /// wire; any other error means the channel is gone.
    fn publish(&mut self, token: &str) -> ChannelResult<()>;

    /// Takes the oldest pending token, or `None` when the queue is empty.
    ///
    /// # Errors
    ///
    /// Only when the channel is gone.
    fn poll(&mut self) -> ChannelResult<Option<String>>;

    /// Deletes the queue.
    ///
    /// # Errors
    ///
    /// When the broker cannot be reached.
    fn release(&mut self) -> ChannelResult<()>;

    /// Publishes a decoded command. [`DirectionCommand::NoChange`] is refused.
    ///
    /// # Errors
    ///
    /// See [`CommandChannel::publish`].
    fn publish_command(&mut self, command: DirectionCommand) -> ChannelResult<()> {
        match command.as_token() {
            Some(token) => self.publish(token),
            None => Err(ChannelError::InvalidToken(command.to_string())),
        }
    }

    /// Discards every pending token and returns how many were dropped.
    ///
    /// # Errors
    ///
    /// See [`CommandChannel::poll`].
    fn drain(&mut self) -> ChannelResult<usize> {
        let mut dropped = 0;
        while self.poll()?.is_some() {
            dropped += 1;
        }
        Ok(dropped)
    }
}

impl<C: CommandChannel + ?Sized> CommandChannel for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn publish(&mut self, token: &str) -> ChannelResult<()> {
        (**self).publish(token)
    }

    fn poll(&mut self) -> ChannelResult<Option<String>> {
        (**self).poll()
    }

    fn release(&mut self) -> ChannelResult<()> {
        (**self).release()
    }
}

/// Checks that a token is a single non-empty word.
///
/// # Errors
///
/// [`ChannelError::InvalidToken`] otherwise.
pub fn validate_token(token: &str) -> ChannelResult<()> {
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(ChannelError::InvalidToken(token.to_string()));
    }
    Ok(())
}
