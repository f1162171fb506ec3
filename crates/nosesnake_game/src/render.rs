//! # Rendering
//!
//! Rendering only observes the game. [`ConsoleRenderer`] draws the board as
//! text, one character per cell:
//!
//! ```text
//! Score : 2
//! +--------+
//! |        |
//! |  ooO * |
//! |        |
//! +--------+
//! ```

use std::io::Write;

use crate::board::Board;
use crate::machine::GamePhase;
use crate::state::SnakeState;

/// Game-over title.
pub const GAME_OVER_TITLE: &str = "YOU DIED";

/// Game-over instructions.
pub const RETRY_PROMPT: &str = "Slide nose right to play again | Slide nose left to quit";

/// Score line shown on every screen.
#[must_use]
pub fn score_line(score: u32) -> String {
    format!("Score : {score}")
}

/// Draws the game once per tick.
pub trait Renderer {
    /// Draws the current frame. Must not block for long.
    fn render(&mut self, board: &Board, phase: GamePhase, state: &SnakeState);
}

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Text renderer writing to any [`Write`] sink.
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
    out: W,
    clear: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Renderer that clears the terminal before each frame.
    pub fn new(out: W) -> Self {
        Self { out, clear: true }
    }

    /// Renderer that only appends frames (logs, tests).
    pub fn plain(out: W) -> Self {
        Self { out, clear: false }
    }

    /// The underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn compose(&self, board: &Board, phase: GamePhase, state: &SnakeState) -> String {
        let mut screen = String::new();
        if self.clear {
            screen.push_str(CLEAR_SCREEN);
        }
        match phase {
            GamePhase::GameOver => {
                screen.push_str(GAME_OVER_TITLE);
                screen.push('\n');
                screen.push_str(&score_line(state.score));
                screen.push('\n');
                screen.push_str(RETRY_PROMPT);
                screen.push('\n');
            }
            GamePhase::AwaitingStart => {
                screen.push_str("Get ready...\n");
            }
            GamePhase::Running => {
                screen.push_str(&score_line(state.score));
                screen.push('\n');
                draw_board(&mut screen, board, state);
            }
        }
        screen
    }
}

fn draw_board(screen: &mut String, board: &Board, state: &SnakeState) {
    let columns = board.columns().max(0) as usize;
    let rows = board.rows().max(0) as usize;
    let mut grid = vec![vec![' '; columns]; rows];

    let mut plot = |x: i32, y: i32, glyph: char| {
        if x < 0 || y < 0 {
            return;
        }
        let (column, row) = ((x / board.cell) as usize, (y / board.cell) as usize);
        if let Some(cell) = grid.get_mut(row).and_then(|line| line.get_mut(column)) {
            *cell = glyph;
        }
    };
    plot(state.food.x, state.food.y, '*');
    for segment in state.body.iter().skip(1) {
        plot(segment.x, segment.y, 'o');
    }
    plot(state.position.x, state.position.y, 'O');

    let border = format!("+{}+\n", "-".repeat(columns));
    screen.push_str(&border);
    for line in grid {
        screen.push('|');
        screen.extend(line);
        screen.push_str("|\n");
    }
    screen.push_str(&border);
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, board: &Board, phase: GamePhase, state: &SnakeState) {
        let screen = self.compose(board, phase, state);
        if let Err(e) = self.out.write_all(screen.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::warn!("render failed: {}", e);
        }
    }
}
