//! # NOSESNAKE Snake Game
//!
//! The tracker and the game both read the keyboard, so each needs a
//! terminal of its own:
//!
//! ```bash
//! # terminal 1
//! ./command_broker 2> broker.log &
//! ./nose_tracker
//!
//! # terminal 2
//! ./snake_game 2> game.log
//! ```
//!
//! Difficulty, board size and the rest come from `nosesnake.toml` (or the
//! file named by `NOSESNAKE_CONFIG`). Type `q` and Enter to quit early.

use nosesnake_channel::BrokerChannel;
use nosesnake_game::{Board, ConsoleRenderer, FoodSpawner, GameControlLoop, GameError, GameStateMachine};
use nosesnake_shared::{logging, QuitSignal, Settings};

fn main() {
    let settings = match Settings::load().map_err(GameError::from) {
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

fn run(settings: &Settings) -> Result<(), GameError> {
    let game = &settings.game;
    tracing::info!("snake game {}x{}, difficulty {}", game.width, game.height, game.difficulty);

    let channel = BrokerChannel::create(&settings.channel)?;
    let board = Board::from_config(game);
    let machine = GameStateMachine::new(board, FoodSpawner::from_config(game));
    let renderer = ConsoleRenderer::new(std::io::stdout());

    let quit = QuitSignal::new();
    let _stdin = quit.listen_stdin();

    let mut game_loop = GameControlLoop::new(channel, renderer, machine, game, &settings.channel);
    game_loop.run(&quit)
}
