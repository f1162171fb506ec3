//! # Game Error Types

use nosesnake_channel::ChannelError;
use nosesnake_shared::ConfigError;
use thiserror::Error;

/// Errors that stop the game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The command channel is gone.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Settings could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
