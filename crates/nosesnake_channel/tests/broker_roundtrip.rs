//! Broker round trips over real TCP connections.

use nosesnake_channel::{Broker, BrokerChannel, ChannelError, CommandChannel};
use nosesnake_shared::{ChannelConfig, DirectionCommand, QuitSignal};

struct Harness {
    quit: QuitSignal,
    config: ChannelConfig,
    handle: Option<std::thread::JoinHandle<nosesnake_channel::ChannelResult<()>>>,
}

impl Harness {
    fn start(queue: &str) -> Self {
        let broker = Broker::bind("127.0.0.1:0").unwrap();
        let config = ChannelConfig {
            broker_addr: broker.local_addr().to_string(),
            queue: queue.to_string(),
            ..ChannelConfig::default()
        };
        let quit = QuitSignal::new();
        let handle = broker.spawn(quit.clone());
        Self {
            quit,
            config,
            handle: Some(handle),
        }
    }

    fn connect(&self) -> BrokerChannel {
        BrokerChannel::create(&self.config).unwrap()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.quit.trigger();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[test]
fn test_publish_is_delivered_once() {
    let harness = Harness::start("snake_game");
    let mut tracker = harness.connect();
    let mut game = harness.connect();

    tracker.publish_command(DirectionCommand::Up).unwrap();
    assert_eq!(game.poll().unwrap().as_deref(), Some("UP"));
    assert_eq!(game.poll().unwrap(), None);
    assert_eq!(tracker.poll().unwrap(), None);
}

#[test]
fn test_fifo_across_connections() {
    let harness = Harness::start("snake_game");
    let mut tracker = harness.connect();
    let mut game = harness.connect();

    for command in [DirectionCommand::Up, DirectionCommand::Left, DirectionCommand::Down] {
        tracker.publish_command(command).unwrap();
    }
    assert_eq!(game.poll().unwrap().as_deref(), Some("UP"));
    assert_eq!(game.poll().unwrap().as_deref(), Some("LEFT"));
    assert_eq!(game.poll().unwrap().as_deref(), Some("DOWN"));
    assert_eq!(game.poll().unwrap(), None);
}

#[test]
fn test_empty_poll_repeats_without_error() {
    let harness = Harness::start("snake_game");
    let mut game = harness.connect();
    for _ in 0..5 {
        assert_eq!(game.poll().unwrap(), None);
    }
}

#[test]
fn test_declare_is_idempotent_across_clients() {
    let harness = Harness::start("snake_game");
    let mut first = harness.connect();
    first.publish("START").unwrap();

    // A late second declaration must not wipe the pending token.
    let mut second = harness.connect();
    assert_eq!(second.poll().unwrap().as_deref(), Some("START"));
}

#[test]
fn test_release_is_fatal_for_the_other_end() {
    let harness = Harness::start("snake_game");
    let mut tracker = harness.connect();
    let mut game = harness.connect();

    game.release().unwrap();
    assert_eq!(
        tracker.poll().unwrap_err(),
        ChannelError::UnknownQueue("snake_game".to_string())
    );
    assert_eq!(
        tracker.publish("UP").unwrap_err(),
        ChannelError::UnknownQueue("snake_game".to_string())
    );
}

#[test]
fn test_invalid_token_is_refused_locally() {
    let harness = Harness::start("snake_game");
    let mut tracker = harness.connect();
    assert!(matches!(tracker.publish("UP DOWN"), Err(ChannelError::InvalidToken(_))));
    assert!(matches!(
        tracker.publish_command(DirectionCommand::NoChange),
        Err(ChannelError::InvalidToken(_))
    ));
    assert_eq!(tracker.poll().unwrap(), None);
}

#[test]
fn test_unreachable_broker() {
    let closed = Broker::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().to_string();
    drop(closed);

    let config = ChannelConfig {
        broker_addr: addr,
        ..ChannelConfig::default()
    };
    assert!(matches!(
        BrokerChannel::create(&config),
        Err(ChannelError::ConnectionFailed { .. })
    ));
}

#[test]
fn test_detached_broker_needs_no_quit_input() {
    let broker = Broker::bind("127.0.0.1:0").unwrap();
    let config = ChannelConfig {
        broker_addr: broker.local_addr().to_string(),
        ..ChannelConfig::default()
    };
    // Left running until the test process exits, like a background job.
    std::thread::spawn(move || broker.serve_forever());

    let mut tracker = BrokerChannel::create(&config).unwrap();
    let mut game = BrokerChannel::create(&config).unwrap();
    game.publish_command(DirectionCommand::Start).unwrap();
    assert_eq!(tracker.poll().unwrap().as_deref(), Some("START"));
    tracker.publish_command(DirectionCommand::Right).unwrap();
    assert_eq!(game.poll().unwrap().as_deref(), Some("RIGHT"));
}
