//! # Configuration
//!
//! Both processes start with no arguments. Settings are resolved once at
//! startup in this order:
//!
//! 1. the file named by `NOSESNAKE_CONFIG`, if set;
//! 2. `nosesnake.toml` in the working directory, if it exists;
//! 3. the compile-time defaults in [`crate::constants`].
//!
//! Every key is optional:
//!
//! ```toml
//! log_level = "debug"
//!
//! [channel]
//! broker_addr = "127.0.0.1:5673"
//! queue = "snake_game"
//!
//! [game]
//! difficulty = "hard"
//!
//! [tracker]
//! dead_zone = 25
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::constants;
use crate::difficulty::Difficulty;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "NOSESNAKE_CONFIG";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "nosesnake.toml";

/// Errors raised while loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {reason}")]
    Read {
        /// Path that was tried.
        path: String,
        /// OS error text.
        reason: String,
    },

    /// The file is not valid TOML for [`Settings`].
    #[error("cannot parse config: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Command channel settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Address of the command broker.
    pub broker_addr: String,
    /// Queue name shared by both processes.
    pub queue: String,
    /// Sleep between empty polls while blocked, in milliseconds.
    pub idle_wait_ms: u64,
    /// Broker read/write timeout in milliseconds.
    pub io_timeout_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            broker_addr: constants::BROKER_ADDR.to_string(),
            queue: constants::QUEUE_NAME.to_string(),
            idle_wait_ms: constants::POLL_IDLE.as_millis() as u64,
            io_timeout_ms: constants::BROKER_IO_TIMEOUT.as_millis() as u64,
        }
    }
}

impl ChannelConfig {
    /// Idle wait as a duration.
    #[must_use]
    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait_ms)
    }

    /// Broker timeout as a duration.
    #[must_use]
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

/// Game process settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tick rate preset.
    pub difficulty: Difficulty,
    /// Board width in pixels.
    pub width: i32,
    /// Board height in pixels.
    pub height: i32,
    /// Grid step in pixels.
    pub cell_size: i32,
    /// Wait after publishing START, in milliseconds.
    pub settle_ms: u64,
    /// Seed for food placement. Taken from the clock when absent.
    pub food_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            width: constants::BOARD_WIDTH,
            height: constants::BOARD_HEIGHT,
            cell_size: constants::CELL_SIZE,
            settle_ms: constants::START_SETTLE.as_millis() as u64,
            food_seed: None,
        }
    }
}

impl GameConfig {
    /// Settle interval as a duration.
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Tracker process settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Dead zone in pixels.
    pub dead_zone: i32,
    /// Contour intensity threshold (0-255).
    pub threshold: u8,
    /// Frames per second.
    pub frame_rate: u32,
    /// Pixels the simulated face moves per key press.
    pub nudge_px: i32,
    /// Landmark template file. The built-in template is used when unset.
    pub landmark_model: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            dead_zone: constants::DEAD_ZONE_PX,
            threshold: constants::CONTOUR_THRESHOLD,
            frame_rate: constants::TRACKER_FRAME_RATE,
            nudge_px: 30,
            landmark_model: None,
        }
    }
}

impl TrackerConfig {
    /// Target duration of one frame.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.frame_rate.max(1)))
    }
}

/// Complete settings file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum log level (`trace`, `debug`, `info`, `warn`, `error`).
    pub log_level: String,
    /// Channel section.
    pub channel: ChannelConfig,
    /// Game section.
    pub game: GameConfig,
    /// Tracker section.
    pub tracker: TrackerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            channel: ChannelConfig::default(),
            game: GameConfig::default(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl Settings {
    /// Resolves and loads settings for a process started without arguments.
    ///
    /// # Errors
    ///
    /// Fails when a configuration file exists but cannot be read, parsed or
    /// validated. A missing default file is not an error.
    pub fn load() -> ConfigResult<Self> {
        match resolve_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`], [`ConfigError::Parse`] or
    /// [`ConfigError::Invalid`].
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        let game = &self.game;
        if game.cell_size <= 0 {
            return Err(ConfigError::Invalid(format!("cell_size must be positive, got {}", game.cell_size)));
        }
        if game.width <= game.cell_size || game.height <= game.cell_size {
            return Err(ConfigError::Invalid(format!(
                "board {}x{} must be larger than one cell ({})",
                game.width, game.height, game.cell_size
            )));
        }
        if game.width % game.cell_size != 0 || game.height % game.cell_size != 0 {
            return Err(ConfigError::Invalid(format!(
                "board {}x{} is not a multiple of cell_size {}",
                game.width, game.height, game.cell_size
            )));
        }
        if self.channel.queue.trim().is_empty() || self.channel.queue.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!("bad queue name {:?}", self.channel.queue)));
        }
        if self.channel.io_timeout_ms == 0 {
            return Err(ConfigError::Invalid("io_timeout_ms must be positive".to_string()));
        }
        if self.tracker.dead_zone < 0 {
            return Err(ConfigError::Invalid(format!("dead_zone must not be negative, got {}", self.tracker.dead_zone)));
        }
        if self.tracker.frame_rate == 0 {
            return Err(ConfigError::Invalid("frame_rate must be positive".to_string()));
        }
        Ok(())
    }
}

/// Picks the configuration file for this process, if any.
fn resolve_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}
