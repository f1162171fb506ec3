//! # NOSESNAKE Game
//!
//! Classic Snake steered by nose gestures arriving on the command channel.
//!
//! ```text
//!  CommandChannel ──poll──> GameStateMachine ──> Renderer
//!        ^                        │
//!        └──────── START ─────────┘ (once, at startup)
//! ```
//!
//! ## Rules
//!
//! - 720x480 px board, 10 px grid, snake starts at (100, 50) heading right
//! - one poll and one step per tick, `difficulty` ticks per second
//! - reversing onto yourself is ignored
//! - leaving the board or biting yourself ends the game
//! - on the game-over screen RIGHT retries and LEFT quits

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod board;
pub mod control;
pub mod error;
pub mod machine;
pub mod render;
pub mod state;

pub use board::{Board, FoodSpawner};
pub use control::GameControlLoop;
pub use error::{GameError, GameResult};
pub use machine::{DeathCause, GamePhase, GameStateMachine, TickOutcome, Verdict};
pub use render::{ConsoleRenderer, Renderer};
pub use state::{Cell, Heading, SnakeState};
