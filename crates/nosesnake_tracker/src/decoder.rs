//! # Gesture Decoder
//!
//! Turns successive nose centroids into directional commands.
//!
//! ```text
//!            Δy < -T  -> UP
//!                 │
//!  Δx < -T ───────┼─────── Δx > T
//!   LEFT          │         RIGHT
//!                 │
//!            Δy > T   -> DOWN
//! ```
//!
//! Horizontal movement wins when both axes exceed the dead zone `T`.
//!
//! ## Baseline
//!
//! Before the game starts the baseline simply follows the last frame, so a
//! frame without a face leaves no baseline. Once armed, faceless frames keep
//! the last valid centroid and the next sighting is compared against it.

use nosesnake_shared::DirectionCommand;

/// Nose position in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Centroid {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Centroid {
    /// Creates a centroid.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Classifies the movement between two centroids.
#[must_use]
pub fn classify(previous: Centroid, current: Centroid, dead_zone: i32) -> DirectionCommand {
    let dx = current.x - previous.x;
    let dy = current.y - previous.y;

    if dx > dead_zone {
        DirectionCommand::Right
    } else if dx < -dead_zone {
        DirectionCommand::Left
    } else if dy > dead_zone {
        DirectionCommand::Down
    } else if dy < -dead_zone {
        DirectionCommand::Up
    } else {
        DirectionCommand::NoChange
    }
}

/// Per-tracker decoding state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureDecoder {
    dead_zone: i32,
    baseline: Option<Centroid>,
    armed: bool,
}

impl GestureDecoder {
    /// Fresh decoder: no baseline, not armed.
    #[must_use]
    pub const fn new(dead_zone: i32) -> Self {
        Self::with_baseline(dead_zone, None, false)
    }

    /// Decoder with an explicit prior state.
    #[must_use]
    pub const fn with_baseline(dead_zone: i32, baseline: Option<Centroid>, armed: bool) -> Self {
        Self {
            dead_zone,
            baseline,
            armed,
        }
    }

    /// Switches to the in-game baseline policy.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// True once [`GestureDecoder::arm`] was called.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Centroid the next frame is compared against.
    #[must_use]
    pub const fn baseline(&self) -> Option<Centroid> {
        self.baseline
    }

    /// Dead zone in pixels.
    #[must_use]
    pub const fn dead_zone(&self) -> i32 {
        self.dead_zone
    }

    /// Decodes one frame and updates the baseline.
    pub fn step(&mut self, current: Option<Centroid>) -> DirectionCommand {
        let command = match (self.baseline, current) {
            (Some(previous), Some(current)) => classify(previous, current, self.dead_zone),
            _ => DirectionCommand::NoChange,
        };
        if !self.armed || current.is_some() {
            self.baseline = current;
        }
        command
    }
}
