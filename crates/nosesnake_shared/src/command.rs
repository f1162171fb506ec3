//! # Command Tokens
//!
//! The closed vocabulary carried by the command channel.
//!
//! On the wire every command is a bare UTF-8 word with no payload, no
//! sequence number and no version field:
//!
//! | Token     | Producer | Meaning                               |
//! |-----------|----------|---------------------------------------|
//! | `START`   | game     | Game is up, tracker may begin sending |
//! | `UP`      | tracker  | Nose moved up                         |
//! | `DOWN`    | tracker  | Nose moved down                       |
//! | `LEFT`    | tracker  | Nose moved left (quit on game over)   |
//! | `RIGHT`   | tracker  | Nose moved right (retry on game over) |
//!
//! [`DirectionCommand::NoChange`] has no token and never reaches the wire.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One decoded command. Exactly one value exists per decoding step or tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionCommand {
    /// Move up.
    Up,
    /// Move down.
    Down,
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Nothing happened this step (NONE). Never published.
    NoChange,
    /// One-time start handshake token.
    Start,
}

/// Token that is not part of the command vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command token: {0:?}")]
pub struct UnknownToken(pub String);

impl DirectionCommand {
    /// All commands that travel over the channel.
    pub const WIRE: [Self; 5] = [Self::Start, Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the wire token, or `None` for [`Self::NoChange`].
    #[inline]
    #[must_use]
    pub const fn as_token(self) -> Option<&'static str> {
        match self {
            Self::Up => Some("UP"),
            Self::Down => Some("DOWN"),
            Self::Left => Some("LEFT"),
            Self::Right => Some("RIGHT"),
            Self::Start => Some("START"),
            Self::NoChange => None,
        }
    }

    /// Parses a wire token. Surrounding whitespace is ignored, case is not.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "UP" => Some(Self::Up),
            "DOWN" => Some(Self::Down),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            "START" => Some(Self::Start),
            _ => None,
        }
    }

    /// True for the four directional commands.
    #[inline]
    #[must_use]
    pub const fn is_movement(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// The 180° reverse of a directional command.
    #[must_use]
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Up => Some(Self::Down),
            Self::Down => Some(Self::Up),
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            Self::NoChange | Self::Start => None,
        }
    }
}

impl FromStr for DirectionCommand {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| UnknownToken(s.to_string()))
    }
}

impl fmt::Display for DirectionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token().unwrap_or("NONE"))
    }
}
