//! Playfield geometry and food placement.

use std::time::{SystemTime, UNIX_EPOCH};

use nosesnake_shared::GameConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::state::Cell;

/// Board size in pixels and its grid step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Grid step in pixels.
    pub cell: i32,
}

impl Board {
    /// Creates a board.
    #[must_use]
    pub const fn new(width: i32, height: i32, cell: i32) -> Self {
        Self { width, height, cell }
    }

    /// Board described by the game settings.
    #[must_use]
    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(config.width, config.height, config.cell_size)
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.width / self.cell
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.height / self.cell
    }

    /// True when `cell` lies in `[0, width) x [0, height)`.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }
}

/// Seeded food placement.
///
/// Food never lands on the first row or column: coordinates are drawn from
/// `1..columns` and `1..rows` grid steps.
#[derive(Clone, Debug)]
pub struct FoodSpawner {
    rng: ChaCha8Rng,
}

impl FoodSpawner {
    /// Spawner with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Spawner seeded from the settings, or from the clock when no seed is
    /// configured.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let seed = config.food_seed.unwrap_or_else(clock_seed);
        tracing::debug!("food seed {}", seed);
        Self::seeded(seed)
    }

    /// Draws the next food cell.
    pub fn spawn(&mut self, board: &Board) -> Cell {
        let column = self.rng.gen_range(1..board.columns());
        let row = self.rng.gen_range(1..board.rows());
        Cell::new(column * board.cell, row * board.cell)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}
