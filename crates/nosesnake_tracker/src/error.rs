//! # Tracker Error Types
//!
//! Sensor absence is not represented here: a frame without a face simply
//! yields no command.

use nosesnake_channel::ChannelError;
use thiserror::Error;

/// Errors that stop the tracker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The camera could not be opened or stopped delivering frames.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The landmark model failed to load.
    #[error("cannot load landmark model: {0}")]
    ModelLoad(String),

    /// The command channel is gone.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
