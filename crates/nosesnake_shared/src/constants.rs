//! # Defaults
//!
//! Values baked into both binaries. A `nosesnake.toml` file may override
//! any of them (see [`crate::config`]).

use std::time::Duration;

// =============================================================================
// BOARD
// =============================================================================

/// Board width in pixels.
pub const BOARD_WIDTH: i32 = 720;

/// Board height in pixels.
pub const BOARD_HEIGHT: i32 = 480;

/// Grid step in pixels. Every position is a multiple of this.
pub const CELL_SIZE: i32 = 10;

/// Snake length at game start and after every restart.
pub const INITIAL_LENGTH: usize = 3;

/// Head position at game start.
pub const INITIAL_POSITION: (i32, i32) = (100, 50);

/// Delay between publishing START and the first tick.
pub const START_SETTLE: Duration = Duration::from_secs(2);

// =============================================================================
// TRACKER
// =============================================================================

/// Minimum centroid movement (pixels) between two frames that counts as a
/// gesture.
pub const DEAD_ZONE_PX: i32 = 20;

/// Camera frame rate assumed by the tracker loop.
pub const TRACKER_FRAME_RATE: u32 = 30;

/// Intensity threshold handed to the contour stage (0-255).
pub const CONTOUR_THRESHOLD: u8 = 0;

/// Number of facial landmarks produced by the predictor.
pub const NUM_FACIAL_LANDMARKS: usize = 68;

/// Landmark indices that outline the nose.
pub const NOSE_LANDMARKS: [usize; 9] = [27, 28, 29, 30, 31, 32, 33, 34, 35];

// =============================================================================
// CHANNEL
// =============================================================================

/// Queue shared by tracker and game.
pub const QUEUE_NAME: &str = "snake_game";

/// Local command broker address.
pub const BROKER_ADDR: &str = "127.0.0.1:5673";

/// Idle wait between two empty polls in blocking waits.
pub const POLL_IDLE: Duration = Duration::from_millis(10);

/// Read/write timeout on the broker connection. Hitting it is fatal.
pub const BROKER_IO_TIMEOUT: Duration = Duration::from_secs(5);
