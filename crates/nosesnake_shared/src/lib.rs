//! # NOSESNAKE Shared
//!
//! Common types used by both the nose tracker and the snake game.
//!
//! ## CRITICAL RULE
//!
//! The two processes never share memory. Everything they agree on lives
//! here: the token vocabulary carried by the command channel, the defaults
//! baked into both binaries, and the configuration file layout.
//!
//! ```text
//! ┌──────────────┐   "UP" "LEFT" ...   ┌──────────────┐
//! │ nose_tracker │ ──────────────────> │  snake_game  │
//! │              │ <────────────────── │              │
//! └──────────────┘       "START"       └──────────────┘
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod logging;
pub mod signal;

pub use command::{DirectionCommand, UnknownToken};
pub use config::{ChannelConfig, ConfigError, ConfigResult, GameConfig, Settings, TrackerConfig};
pub use difficulty::Difficulty;
pub use signal::QuitSignal;
