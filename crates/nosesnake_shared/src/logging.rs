//! Logging bootstrap for the binaries.

use std::io::{self, Stderr};

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::SubscriberBuilder;

/// Fmt subscriber builder writing to stderr.
pub type StderrBuilder = SubscriberBuilder<DefaultFields, Format, LevelFilter, fn() -> Stderr>;

/// Maps a configured level name to a [`Level`]. Unknown names fall back to
/// `INFO`.
#[must_use]
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Subscriber configuration shared by every binary. Stdout belongs to the
/// console renderer, so events go to stderr.
#[must_use]
pub fn builder(level: &str) -> StderrBuilder {
    let writer: fn() -> Stderr = io::stderr;
    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_writer(writer)
}

/// Installs the global fmt subscriber. Calling it twice is harmless.
pub fn init(level: &str) {
    let _ = builder(level).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_go_to_stderr() {
        let builder: SubscriberBuilder<_, _, _, fn() -> Stderr> = builder("debug");
        let subscriber = builder.finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("stderr only");
        });
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }
}
