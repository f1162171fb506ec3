//! # NOSESNAKE Command Broker
//!
//! Hosts the named queues used by `nose_tracker` and `snake_game`. Start it
//! before either of them.
//!
//! ```bash
//! ./command_broker &          # listens on 127.0.0.1:5673
//! NOSESNAKE_CONFIG=lab.toml ./command_broker
//! ```
//!
//! Stop it with Ctrl-C (or `kill %1` when backgrounded). Queues live in
//! memory only.

use nosesnake_channel::Broker;
use nosesnake_shared::{logging, Settings};

fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&settings.log_level);

    let broker = match Broker::bind(&settings.channel.broker_addr) {
        Ok(broker) => broker,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::error!("check whether another broker is already running");
            std::process::exit(1);
        }
    };

    if let Err(e) = broker.serve_forever() {
        tracing::error!("broker failed: {}", e);
        std::process::exit(1);
    }
}
