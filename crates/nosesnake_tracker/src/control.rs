//! # Tracker Control Loop
//!
//! Runs at the camera frame rate:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ 1. read frame                                               │
//! │ 2. locate nose (faces -> landmarks -> contour -> centroid)  │
//! │ 3. decoder.step(centroid)                                   │
//! │ 4a. not started: poll for START, arm decoder on receipt     │
//! │ 4b. started:     publish UP / DOWN / LEFT / RIGHT           │
//! │ 5. sleep out the rest of the frame                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Publishing is fire-and-forget. The loop stops on the local quit signal
//! and then releases the channel and the camera.

use std::thread;
use std::time::{Duration, Instant};

use nosesnake_channel::CommandChannel;
use nosesnake_shared::{DirectionCommand, QuitSignal, TrackerConfig};

use crate::decoder::GestureDecoder;
use crate::error::TrackerResult;
use crate::vision::{locate_nose, Camera, ContourStage, FaceModel};

/// Counters kept by the loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Frames processed.
    pub frames: u64,
    /// Frames where no nose centroid was found.
    pub faceless_frames: u64,
    /// Commands published.
    pub published: u64,
}

/// Capture, decode and publish loop.
pub struct TrackerControlLoop<C, K, M, S> {
    channel: C,
    camera: K,
    model: M,
    contour: S,
    decoder: GestureDecoder,
    threshold: u8,
    frame_interval: Duration,
    started: bool,
    stats: TrackerStats,
}

impl<C, K, M, S> TrackerControlLoop<C, K, M, S>
where
    C: CommandChannel,
    K: Camera,
    M: FaceModel,
    S: ContourStage,
{
    /// Assembles the loop. The game has not started yet.
    pub fn new(channel: C, camera: K, model: M, contour: S, config: &TrackerConfig) -> Self {
        Self {
            channel,
            camera,
            model,
            contour,
            decoder: GestureDecoder::new(config.dead_zone),
            threshold: config.threshold,
            frame_interval: config.frame_interval(),
            started: false,
            stats: TrackerStats::default(),
        }
    }

    /// True once START was received.
    #[must_use]
    pub const fn started(&self) -> bool {
        self.started
    }

    /// Decoder state.
    #[must_use]
    pub const fn decoder(&self) -> &GestureDecoder {
        &self.decoder
    }

    /// Loop counters.
    #[must_use]
    pub const fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// The command channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Processes one frame and returns the decoded command.
    ///
    /// # Errors
    ///
    /// Camera failure or channel loss. Both are fatal.
    pub fn run_frame(&mut self) -> TrackerResult<DirectionCommand> {
        let frame = self.camera.read_frame()?;
        let centroid = locate_nose(&frame, &mut self.model, &mut self.contour, self.threshold);
        self.stats.frames += 1;
        if centroid.is_none() {
            self.stats.faceless_frames += 1;
        }

        let command = self.decoder.step(centroid);

        if !self.started {
            self.await_start()?;
        } else if command.is_movement() {
            self.channel.publish_command(command)?;
            self.stats.published += 1;
            tracing::info!("sent command {}", command);
        }
        Ok(command)
    }

    /// Non-blocking check for the START token.
    fn await_start(&mut self) -> TrackerResult<()> {
        let Some(token) = self.channel.poll()? else {
            return Ok(());
        };
        match DirectionCommand::from_token(&token) {
            Some(DirectionCommand::Start) => {
                self.started = true;
                self.decoder.arm();
                tracing::info!("game started, sending commands");
            }
            _ => tracing::debug!("ignoring {:?} while waiting for START", token),
        }
        Ok(())
    }

    /// Runs until `quit` is triggered, then releases the channel and the
    /// camera.
    ///
    /// # Errors
    ///
    /// The first fatal error. Resources are released before returning it.
    pub fn run(&mut self, quit: &QuitSignal) -> TrackerResult<()> {
        tracing::info!(
            "tracker running at {} ms per frame, waiting for START",
            self.frame_interval.as_millis()
        );

        let result = loop {
            if quit.is_triggered() {
                break Ok(());
            }
            let frame_start = Instant::now();
            if let Err(e) = self.run_frame() {
                break Err(e);
            }
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                thread::sleep(self.frame_interval - elapsed);
            }
        };

        self.camera.release();
        let released = self.channel.release();
        tracing::info!(
            "tracker stopped after {} frames ({} without a face, {} commands sent)",
            self.stats.frames,
            self.stats.faceless_frames,
            self.stats.published
        );
        result?;
        released?;
        Ok(())
    }
}
