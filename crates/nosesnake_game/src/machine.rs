//! # Game State Machine
//!
//! ## Phases
//!
//! - **AWAITING_START**: START published, waiting out the settle interval.
//! - **RUNNING**: one poll and one move per tick.
//! - **GAME_OVER**: score frozen, waiting for RIGHT (retry) or LEFT (quit).
//!
//! ```text
//! AWAITING_START ──go──> RUNNING ──wall / self──> GAME_OVER
//!                           ^                        │
//!                           └──────── RIGHT ─────────┤
//!                                                    └── LEFT ──> quit
//! ```
//!
//! ## Stale commands
//!
//! The channel is flushed when entering GAME_OVER and again when a retry
//! re-enters RUNNING, so a gesture made in one phase never acts in the next.

use std::thread;
use std::time::Duration;

use nosesnake_channel::CommandChannel;
use nosesnake_shared::{DirectionCommand, QuitSignal};

use crate::board::{Board, FoodSpawner};
use crate::error::GameResult;
use crate::state::{Heading, SnakeState};

/// Game phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// START sent, first tick not yet run.
    AwaitingStart,
    /// Snake moving.
    Running,
    /// Snake dead, waiting for a decision.
    GameOver,
}

impl GamePhase {
    /// Upper-case name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingStart => "AWAITING_START",
            Self::Running => "RUNNING",
            Self::GameOver => "GAME_OVER",
        }
    }
}

/// What killed the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    /// Head left the board.
    OutOfBounds,
    /// Head ran into the body.
    SelfCollision,
}

impl DeathCause {
    /// Short description for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfBounds => "out of bounds",
            Self::SelfCollision => "self collision",
        }
    }
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing happened.
    Idle,
    /// Snake moved.
    Moved,
    /// Snake ate; new score.
    Ate {
        /// Score after eating.
        score: u32,
    },
    /// Snake died; the machine is now in GAME_OVER.
    Died {
        /// Final score.
        score: u32,
        /// Terminal condition that fired first.
        cause: DeathCause,
    },
}

/// Decision taken on the game-over screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Fresh game started.
    Restart,
    /// Player left (or local quit).
    Quit,
    /// Nothing decided yet.
    Wait,
}

/// Snake rules plus phase tracking.
#[derive(Clone, Debug)]
pub struct GameStateMachine {
    phase: GamePhase,
    state: SnakeState,
    board: Board,
    food: FoodSpawner,
    games: u32,
}

impl GameStateMachine {
    /// New machine in AWAITING_START with a fresh snake.
    #[must_use]
    pub fn new(board: Board, mut food: FoodSpawner) -> Self {
        let state = SnakeState::initial(food.spawn(&board), board.cell);
        Self {
            phase: GamePhase::AwaitingStart,
            state,
            board,
            food,
            games: 0,
        }
    }

    /// Machine resumed from an explicit state (tests, replays).
    #[must_use]
    pub fn from_parts(board: Board, food: FoodSpawner, state: SnakeState, phase: GamePhase) -> Self {
        Self {
            phase,
            state,
            board,
            food,
            games: u32::from(phase != GamePhase::AwaitingStart),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current snake.
    #[must_use]
    pub const fn state(&self) -> &SnakeState {
        &self.state
    }

    /// Board geometry.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Games started so far, including the current one.
    #[must_use]
    pub const fn games(&self) -> u32 {
        self.games
    }

    /// AWAITING_START -> RUNNING.
    pub fn go(&mut self) {
        if self.phase != GamePhase::AwaitingStart {
            tracing::warn!("go ignored in phase {}", self.phase.as_str());
            return;
        }
        self.games += 1;
        self.transition_to(GamePhase::Running);
    }

    fn transition_to(&mut self, phase: GamePhase) {
        tracing::info!("game phase {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
    }

    /// Advances the snake by one tick using an already-polled command.
    ///
    /// Non-movement commands and reversals keep the current heading.
    pub fn apply(&mut self, command: Option<DirectionCommand>) -> TickOutcome {
        if self.phase != GamePhase::Running {
            return TickOutcome::Idle;
        }

        if let Some(heading) = command.and_then(Heading::from_command) {
            if heading != self.state.direction.opposite() {
                self.state.direction = heading;
            }
        }

        let state = &mut self.state;
        state.position = state.direction.advance(state.position, self.board.cell);
        state.body.push_front(state.position);

        let mut outcome = TickOutcome::Moved;
        if state.position == state.food {
            state.score += 1;
            state.food = self.food.spawn(&self.board);
            outcome = TickOutcome::Ate { score: state.score };
        } else {
            state.body.pop_back();
        }

        let cause = if !self.board.contains(state.position) {
            Some(DeathCause::OutOfBounds)
        } else if state.bites_itself() {
            Some(DeathCause::SelfCollision)
        } else {
            None
        };

        match cause {
            Some(cause) => {
                let score = state.score;
                tracing::info!("snake died ({}) at {} with score {}", cause.as_str(), state.position, score);
                self.transition_to(GamePhase::GameOver);
                TickOutcome::Died { score, cause }
            }
            None => outcome,
        }
    }

    /// One RUNNING tick: poll the channel once, then [`Self::apply`].
    ///
    /// # Errors
    ///
    /// Channel loss.
    pub fn tick<C: CommandChannel + ?Sized>(&mut self, channel: &mut C) -> GameResult<TickOutcome> {
        if self.phase != GamePhase::Running {
            return Ok(TickOutcome::Idle);
        }

        let command = channel.poll()?.and_then(|token| decode(&token));
        let outcome = self.apply(command);

        if matches!(outcome, TickOutcome::Died { .. }) {
            flush(channel)?;
        }
        Ok(outcome)
    }

    /// Applies a game-over decision.
    pub fn resolve_game_over(&mut self, command: Option<DirectionCommand>) -> Verdict {
        if self.phase != GamePhase::GameOver {
            return Verdict::Wait;
        }
        match command {
            Some(DirectionCommand::Right) => {
                self.restart();
                Verdict::Restart
            }
            Some(DirectionCommand::Left) => {
                tracing::info!("player chose to quit");
                Verdict::Quit
            }
            _ => Verdict::Wait,
        }
    }

    fn restart(&mut self) {
        let food = self.food.spawn(&self.board);
        self.state = SnakeState::initial(food, self.board.cell);
        self.games += 1;
        tracing::info!("new game #{}", self.games);
        self.transition_to(GamePhase::Running);
    }

    /// Blocks on the game-over screen until RIGHT, LEFT or a local quit.
    /// Never returns [`Verdict::Wait`].
    ///
    /// Empty polls sleep for `idle`; unrelated tokens are ignored.
    ///
    /// # Errors
    ///
    /// Channel loss.
    pub fn await_decision<C: CommandChannel + ?Sized>(
        &mut self,
        channel: &mut C,
        idle: Duration,
        quit: &QuitSignal,
    ) -> GameResult<Verdict> {
        loop {
            if quit.is_triggered() {
                return Ok(Verdict::Quit);
            }
            let Some(token) = channel.poll()? else {
                thread::sleep(idle);
                continue;
            };
            match self.resolve_game_over(decode(&token)) {
                Verdict::Restart => {
                    flush(channel)?;
                    return Ok(Verdict::Restart);
                }
                Verdict::Quit => return Ok(Verdict::Quit),
                Verdict::Wait => {}
            }
        }
    }
}

/// Parses a polled token and echoes it to the log.
fn decode(token: &str) -> Option<DirectionCommand> {
    tracing::info!("received {}", token);
    let command = DirectionCommand::from_token(token);
    if command.is_none() {
        tracing::warn!("ignoring unknown token {:?}", token);
    }
    command
}

fn flush<C: CommandChannel + ?Sized>(channel: &mut C) -> GameResult<()> {
    let dropped = channel.drain()?;
    if dropped > 0 {
        tracing::debug!("flushed {} stale command(s)", dropped);
    }
    Ok(())
}
