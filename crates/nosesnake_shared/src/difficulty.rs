//! Difficulty presets. The difficulty is the game loop tick rate.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

/// Game speed preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 5 ticks per second.
    Easy,
    /// 10 ticks per second.
    #[default]
    Medium,
    /// 25 ticks per second.
    Hard,
    /// 40 ticks per second.
    Harder,
    /// 60 ticks per second.
    Impossible,
}

impl Difficulty {
    /// Ticks per second of the game loop.
    #[inline]
    #[must_use]
    pub const fn ticks_per_second(self) -> u32 {
        match self {
            Self::Easy => 5,
            Self::Medium => 10,
            Self::Hard => 25,
            Self::Harder => 40,
            Self::Impossible => 60,
        }
    }

    /// Wall-clock duration of one tick.
    #[must_use]
    pub fn tick_duration(self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.ticks_per_second()))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Harder => "harder",
            Self::Impossible => "impossible",
        };
        write!(f, "{name} ({} ticks/s)", self.ticks_per_second())
    }
}
