//! # NOSESNAKE Nose Tracker
//!
//! Watches the (simulated) face and publishes nose gestures to the game.
//!
//! ```bash
//! ./command_broker 2> broker.log &
//! ./nose_tracker      # foreground, then start ./snake_game in another terminal
//! ```
//!
//! Keys (followed by Enter): `w` `a` `s` `d` move the face, `x` hides it,
//! `q` quits. The keys come from stdin, so the tracker must not run as a
//! background job.

use nosesnake_channel::BrokerChannel;
use nosesnake_shared::{logging, QuitSignal, Settings};
use nosesnake_tracker::sim::{self, SimulatedCamera, TemplateFaceModel};
use nosesnake_tracker::{HullMoments, TrackerControlLoop, TrackerError};

fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&settings.log_level);

    if let Err(e) = run(&settings) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> Result<(), TrackerError> {
    let model = TemplateFaceModel::from_config(&settings.tracker)?;
    let channel = BrokerChannel::create(&settings.channel)?;

    let quit = QuitSignal::new();
    let keys = sim::spawn_keyboard(settings.tracker.nudge_px);
    let camera = SimulatedCamera::new(sim::SIM_FRAME_WIDTH, sim::SIM_FRAME_HEIGHT, keys, quit.clone());
    tracing::info!("simulated camera ready (w/a/s/d move, x hide, q quit)");

    let mut tracker = TrackerControlLoop::new(channel, camera, model, HullMoments, &settings.tracker);
    tracker.run(&quit)
}
