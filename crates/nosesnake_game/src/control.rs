//! # Game Control Loop
//!
//! ```text
//! publish START ─> sleep(settle) ─> go
//!        ┌─────────────────────────────────────────┐
//!        │ tick: poll + move   (1 / difficulty s)  │
//!        │ render                                  │
//!        │ died? ─> await_decision ─> RIGHT: again │
//!        │                         └> LEFT: stop   │
//!        └─────────────────────────────────────────┘
//! release channel
//! ```

use std::thread;
use std::time::{Duration, Instant};

use nosesnake_channel::CommandChannel;
use nosesnake_shared::{ChannelConfig, DirectionCommand, GameConfig, QuitSignal};

use crate::error::GameResult;
use crate::machine::{GameStateMachine, TickOutcome, Verdict};
use crate::render::Renderer;

/// Drives a [`GameStateMachine`] at the configured tick rate.
pub struct GameControlLoop<C, R> {
    channel: C,
    renderer: R,
    machine: GameStateMachine,
    tick_interval: Duration,
    settle: Duration,
    idle: Duration,
}

impl<C: CommandChannel, R: Renderer> GameControlLoop<C, R> {
    /// Assembles the loop around a machine in AWAITING_START.
    pub fn new(
        channel: C,
        renderer: R,
        machine: GameStateMachine,
        game: &GameConfig,
        channel_config: &ChannelConfig,
    ) -> Self {
        Self {
            channel,
            renderer,
            machine,
            tick_interval: game.difficulty.tick_duration(),
            settle: game.settle(),
            idle: channel_config.idle_wait(),
        }
    }

    /// The state machine.
    #[must_use]
    pub const fn machine(&self) -> &GameStateMachine {
        &self.machine
    }

    /// The command channel.
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }

    /// The renderer.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    fn render(&mut self) {
        self.renderer
            .render(self.machine.board(), self.machine.phase(), self.machine.state());
    }

    /// Publishes START, waits for the tracker to pick it up and enters
    /// RUNNING.
    ///
    /// # Errors
    ///
    /// Channel loss.
    pub fn start(&mut self) -> GameResult<()> {
        self.channel.publish_command(DirectionCommand::Start)?;
        tracing::info!("START sent, settling for {} ms", self.settle.as_millis());
        self.render();
        thread::sleep(self.settle);
        self.machine.go();
        Ok(())
    }

    /// Plays until the player quits on the game-over screen or `quit` is
    /// triggered, then releases the channel.
    ///
    /// # Errors
    ///
    /// Channel loss. The process is expected to exit.
    pub fn run(&mut self, quit: &QuitSignal) -> GameResult<()> {
        self.start()?;

        loop {
            if quit.is_triggered() {
                tracing::info!("quit requested");
                break;
            }
            let mut tick_start = Instant::now();

            let outcome = self.machine.tick(&mut self.channel)?;
            self.render();

            if let TickOutcome::Died { score, .. } = outcome {
                tracing::info!("game over, score {}", score);
                if self.machine.await_decision(&mut self.channel, self.idle, quit)? != Verdict::Restart {
                    break;
                }
                self.render();
                tick_start = Instant::now();
            }

            let elapsed = tick_start.elapsed();
            if elapsed < self.tick_interval {
                thread::sleep(self.tick_interval - elapsed);
            }
        }

        self.channel.release()?;
        tracing::info!("game closed after {} game(s)", self.machine.games());
        Ok(())
    }
}
