//! # Local Quit Signal
//!
//! Shutdown is cooperative. Each process owns one [`QuitSignal`]; loops check
//! it once per iteration and tear down their resources when it is set.

use std::io::{BufRead, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// Shared shutdown flag.
#[derive(Clone, Debug, Default)]
pub struct QuitSignal {
    flag: Arc<AtomicBool>,
}

impl QuitSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True once shutdown was requested.
    #[inline]
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Spawns a thread that triggers the signal when `q` is entered on stdin.
    ///
    /// Returns `None` without reading anything when stdin is not a terminal.
    /// End of input leaves the signal untouched.
    pub fn listen_stdin(&self) -> Option<thread::JoinHandle<()>> {
        if !std::io::stdin().is_terminal() {
            tracing::debug!("stdin is not a terminal, keyboard quit disabled");
            return None;
        }
        let signal = self.clone();
        Some(thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().eq_ignore_ascii_case("q") {
                    tracing::info!("quit requested from keyboard");
                    signal.trigger();
                    break;
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_shared() {
        let signal = QuitSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_triggered());
        signal.trigger();
        assert!(clone.is_triggered());
    }
}
