//! Full game flows over the in-memory channel and a scripted channel.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use nosesnake_channel::{ChannelResult, CommandChannel, MemoryChannel, MemoryHub};
use nosesnake_game::{
    Board, Cell, ConsoleRenderer, DeathCause, FoodSpawner, GameControlLoop, GamePhase, GameStateMachine, Heading,
    SnakeState, TickOutcome, Verdict,
};
use nosesnake_shared::{ChannelConfig, Difficulty, DirectionCommand, GameConfig, QuitSignal};

fn board() -> Board {
    Board::new(720, 480, 10)
}

fn cells(points: &[(i32, i32)]) -> VecDeque<Cell> {
    points.iter().map(|&(x, y)| Cell::new(x, y)).collect()
}

fn running_with(state: SnakeState) -> GameStateMachine {
    GameStateMachine::from_parts(board(), FoodSpawner::seeded(9), state, GamePhase::Running)
}

fn channel_pair() -> (MemoryHub, MemoryChannel, MemoryChannel) {
    let hub = MemoryHub::new();
    let tracker = MemoryChannel::create(&hub, "snake_game");
    let game = MemoryChannel::create(&hub, "snake_game");
    (hub, tracker, game)
}

#[test]
fn test_right_moves_one_cell() {
    let (_hub, mut tracker, mut game) = channel_pair();
    let mut machine = running_with(SnakeState::initial(Cell::new(500, 300), 10));

    tracker.publish_command(DirectionCommand::Right).unwrap();
    assert_eq!(machine.tick(&mut game).unwrap(), TickOutcome::Moved);

    let state = machine.state();
    assert_eq!(state.position, Cell::new(110, 50));
    assert_eq!(state.body, cells(&[(110, 50), (100, 50), (90, 50)]));
}

#[test]
fn test_reverse_never_applied() {
    let (_hub, mut tracker, mut game) = channel_pair();
    let mut machine = running_with(SnakeState::initial(Cell::new(500, 300), 10));

    tracker.publish_command(DirectionCommand::Left).unwrap();
    machine.tick(&mut game).unwrap();
    assert_eq!(machine.state().direction, Heading::Right);

    tracker.publish_command(DirectionCommand::Down).unwrap();
    machine.tick(&mut game).unwrap();
    tracker.publish_command(DirectionCommand::Up).unwrap();
    machine.tick(&mut game).unwrap();
    assert_eq!(machine.state().direction, Heading::Down);
}

#[test]
fn test_queued_commands_apply_one_per_tick() {
    let (_hub, mut tracker, mut game) = channel_pair();
    let mut machine = running_with(SnakeState::initial(Cell::new(500, 300), 10));

    tracker.publish_command(DirectionCommand::Down).unwrap();
    tracker.publish_command(DirectionCommand::Left).unwrap();

    machine.tick(&mut game).unwrap();
    assert_eq!(machine.state().direction, Heading::Down);
    machine.tick(&mut game).unwrap();
    assert_eq!(machine.state().direction, Heading::Left);
    assert_eq!(machine.state().position, Cell::new(90, 60));
}

#[test]
fn test_eating_grows_and_respawns_food() {
    let (_hub, _tracker, mut game) = channel_pair();
    let mut machine = running_with(SnakeState::initial(Cell::new(110, 50), 10));

    let outcome = machine.tick(&mut game).unwrap();
    assert_eq!(outcome, TickOutcome::Ate { score: 1 });

    let state = machine.state();
    assert_eq!(state.score, 1);
    assert_eq!(state.body, cells(&[(110, 50), (100, 50), (90, 50), (80, 50)]));
    assert_eq!(state.len(), state.score as usize + 3);
    assert!(board().contains(state.food));
    assert_eq!(state.food.x % 10, 0);
    assert_eq!(state.food.y % 10, 0);
}

#[test]
fn test_leaving_board_keeps_score() {
    let (_hub, _tracker, mut game) = channel_pair();
    let state = SnakeState {
        position: Cell::new(0, 50),
        body: cells(&[(0, 50), (10, 50), (20, 50), (30, 50), (40, 50)]),
        direction: Heading::Left,
        score: 2,
        food: Cell::new(500, 300),
    };
    let mut machine = running_with(state);

    let outcome = machine.tick(&mut game).unwrap();
    assert_eq!(
        outcome,
        TickOutcome::Died {
            score: 2,
            cause: DeathCause::OutOfBounds
        }
    );
    assert_eq!(machine.phase(), GamePhase::GameOver);
    assert_eq!(machine.state().position, Cell::new(-10, 50));
    assert_eq!(machine.state().score, 2);
}

#[test]
fn test_death_flushes_stale_commands() {
    let (_hub, mut tracker, mut game) = channel_pair();
    let state = SnakeState {
        position: Cell::new(0, 50),
        body: cells(&[(0, 50), (10, 50), (20, 50)]),
        direction: Heading::Left,
        score: 0,
        food: Cell::new(500, 300),
    };
    let mut machine = running_with(state);

    tracker.publish_command(DirectionCommand::Right).unwrap();
    tracker.publish_command(DirectionCommand::Up).unwrap();
    tracker.publish_command(DirectionCommand::Left).unwrap();

    // RIGHT is a reversal and ignored by the fatal tick; UP and LEFT are dropped.
    assert!(matches!(machine.tick(&mut game).unwrap(), TickOutcome::Died { .. }));
    assert_eq!(game.pending(), 0);
}

#[test]
fn test_right_on_game_over_restarts() {
    let (_hub, mut tracker, mut game) = channel_pair();
    let mut state = SnakeState::initial(Cell::new(500, 300), 10);
    state.score = 5;
    let mut machine = GameStateMachine::from_parts(board(), FoodSpawner::seeded(9), state, GamePhase::GameOver);

    tracker.publish("UP").unwrap();
    tracker.publish("RIGHT").unwrap();
    tracker.publish("DOWN").unwrap();

    let verdict = machine
        .await_decision(&mut game, Duration::from_millis(1), &QuitSignal::new())
        .unwrap();
    assert_eq!(verdict, Verdict::Restart);
    assert_eq!(machine.phase(), GamePhase::Running);

    let state = machine.state();
    assert_eq!(state.position, Cell::new(100, 50));
    assert_eq!(state.body, cells(&[(100, 50), (90, 50), (80, 50)]));
    assert_eq!(state.direction, Heading::Right);
    assert_eq!(state.score, 0);
    // DOWN was queued during GAME_OVER and must not steer the new game.
    assert_eq!(game.pending(), 0);
}

#[test]
fn test_left_on_game_over_quits() {
    let (_hub, mut tracker, mut game) = channel_pair();
    let mut machine = GameStateMachine::from_parts(
        board(),
        FoodSpawner::seeded(9),
        SnakeState::initial(Cell::new(500, 300), 10),
        GamePhase::GameOver,
    );

    tracker.publish("START").unwrap();
    tracker.publish("garbage").unwrap();
    tracker.publish("LEFT").unwrap();
    let verdict = machine
        .await_decision(&mut game, Duration::from_millis(1), &QuitSignal::new())
        .unwrap();
    assert_eq!(verdict, Verdict::Quit);
}

#[test]
fn test_local_quit_unblocks_game_over() {
    let (_hub, _tracker, mut game) = channel_pair();
    let mut machine = GameStateMachine::from_parts(
        board(),
        FoodSpawner::seeded(9),
        SnakeState::initial(Cell::new(500, 300), 10),
        GamePhase::GameOver,
    );
    let quit = QuitSignal::new();
    quit.trigger();
    assert_eq!(
        machine.await_decision(&mut game, Duration::from_millis(1), &quit).unwrap(),
        Verdict::Quit
    );
}

#[test]
fn test_empty_channel_keeps_heading() {
    let (_hub, _tracker, mut game) = channel_pair();
    let mut machine = running_with(SnakeState::initial(Cell::new(500, 300), 10));
    for _ in 0..3 {
        assert_eq!(machine.tick(&mut game).unwrap(), TickOutcome::Moved);
    }
    assert_eq!(machine.state().position, Cell::new(130, 50));
}

// -----------------------------------------------------------------------------
// Control loop
// -----------------------------------------------------------------------------

/// Replays poll results in order and records everything else.
#[derive(Default)]
struct ScriptedChannel {
    polls: VecDeque<Option<&'static str>>,
    polled_at: Vec<Instant>,
    published: Vec<String>,
    released: bool,
}

impl ScriptedChannel {
    fn new(polls: &[Option<&'static str>]) -> Self {
        Self {
            polls: polls.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl CommandChannel for ScriptedChannel {
    fn name(&self) -> &str {
        "scripted"
    }

    fn publish(&mut self, token: &str) -> ChannelResult<()> {
        self.published.push(token.to_string());
        Ok(())
    }

    fn poll(&mut self) -> ChannelResult<Option<String>> {
        self.polled_at.push(Instant::now());
        Ok(self.polls.pop_front().flatten().map(str::to_string))
    }

    fn release(&mut self) -> ChannelResult<()> {
        self.released = true;
        Ok(())
    }
}

fn config_at(difficulty: Difficulty) -> GameConfig {
    GameConfig {
        difficulty,
        settle_ms: 0,
        food_seed: Some(1),
        ..GameConfig::default()
    }
}

/// Turn up at (100, 50) and hit the top wall on the sixth tick; the seventh
/// entry answers the flush.
const DIE_AT_TOP: [Option<&str>; 7] = [Some("UP"), None, None, None, None, None, None];

fn game_loop(polls: &[Option<&'static str>]) -> GameControlLoop<ScriptedChannel, ConsoleRenderer<Vec<u8>>> {
    game_loop_at(Difficulty::Impossible, polls)
}

fn game_loop_at(
    difficulty: Difficulty,
    polls: &[Option<&'static str>],
) -> GameControlLoop<ScriptedChannel, ConsoleRenderer<Vec<u8>>> {
    let config = config_at(difficulty);
    let board = Board::from_config(&config);
    // Keep the first food off the path.
    let state = SnakeState::initial(Cell::new(700, 400), board.cell);
    let machine = GameStateMachine::from_parts(board, FoodSpawner::seeded(1), state, GamePhase::AwaitingStart);

    GameControlLoop::new(
        ScriptedChannel::new(polls),
        ConsoleRenderer::plain(Vec::new()),
        machine,
        &config,
        &ChannelConfig::default(),
    )
}

#[test]
fn test_control_loop_left_quits_and_releases() {
    let mut script = DIE_AT_TOP.to_vec();
    script.push(Some("LEFT"));
    let mut game = game_loop(&script);

    game.run(&QuitSignal::new()).unwrap();

    assert_eq!(game.channel().published, vec!["START".to_string()]);
    assert!(game.channel().released);
    assert_eq!(game.machine().phase(), GamePhase::GameOver);
    assert_eq!(game.machine().games(), 1);

    let screen = String::from_utf8(game.renderer().get_ref().clone()).unwrap();
    assert!(screen.contains("YOU DIED"));
    assert!(screen.contains("Slide nose right to play again | Slide nose left to quit"));
}

#[test]
fn test_control_loop_retry_then_quit() {
    let mut script = DIE_AT_TOP.to_vec();
    script.push(None);
    script.push(Some("RIGHT"));
    script.push(None); // flush on restart
    script.extend(DIE_AT_TOP);
    script.push(Some("LEFT"));
    let mut game = game_loop(&script);

    game.run(&QuitSignal::new()).unwrap();

    assert_eq!(game.machine().games(), 2);
    assert_eq!(game.machine().phase(), GamePhase::GameOver);
    assert!(game.channel().released);
    assert!(game.channel().polls.is_empty());
}

#[test]
fn test_first_tick_after_restart_is_paced() {
    let mut script = DIE_AT_TOP.to_vec();
    script.push(Some("RIGHT"));
    script.push(None); // flush on restart
    let restart_flush = script.len() - 1;
    script.extend(DIE_AT_TOP);
    script.push(Some("LEFT"));
    let mut game = game_loop_at(Difficulty::Hard, &script);

    game.run(&QuitSignal::new()).unwrap();

    let polled_at = &game.channel().polled_at;
    let gap = polled_at[restart_flush + 1] - polled_at[restart_flush];
    assert!(gap >= Difficulty::Hard.tick_duration(), "first tick after restart came {gap:?} after it");
    assert_eq!(game.machine().games(), 2);
}

#[test]
fn test_control_loop_local_quit() {
    let mut game = game_loop(&[]);
    let quit = QuitSignal::new();
    quit.trigger();

    game.run(&quit).unwrap();
    assert_eq!(game.channel().published, vec!["START".to_string()]);
    assert_eq!(game.machine().phase(), GamePhase::Running);
    assert!(game.channel().released);
}
