//! # In-Process Channel
//!
//! A [`MemoryHub`] plays the broker for components living in one process
//! (tests, benchmarks, the single-binary demo). Each named queue is an
//! unbounded crossbeam channel; both ends of a queue clone the same pair.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use parking_lot::Mutex;

use crate::error::{ChannelError, ChannelResult};
use crate::{validate_token, CommandChannel};

/// One declared queue.
#[derive(Clone, Debug)]
struct Slot {
    sender: Sender<String>,
    receiver: Receiver<String>,
    /// Cleared when the queue is released.
    alive: Arc<AtomicBool>,
}

impl Slot {
    fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            alive: Arc::new(AtomicBool::new(true)),
        }
    }
}

/// Registry of named in-process queues.
#[derive(Clone, Debug, Default)]
pub struct MemoryHub {
    queues: Arc<Mutex<HashMap<String, Slot>>>,
}

impl MemoryHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.queues.lock().contains_key(name)
    }

    fn declare(&self, name: &str) -> Slot {
        self.queues
            .lock()
            .entry(name.to_string())
            .or_insert_with(Slot::new)
            .clone()
    }

    fn delete(&self, name: &str) {
        if let Some(slot) = self.queues.lock().remove(name) {
            slot.alive.store(false, Ordering::SeqCst);
        }
    }
}

/// Handle on a queue of a [`MemoryHub`].
#[derive(Debug)]
pub struct MemoryChannel {
    name: String,
    slot: Slot,
    hub: MemoryHub,
}

impl MemoryChannel {
    /// Declares `name` on the hub (idempotent) and returns a handle to it.
    #[must_use]
    pub fn create(hub: &MemoryHub, name: impl Into<String>) -> Self {
        let name = name.into();
        let slot = hub.declare(&name);
        Self {
            name,
            slot,
            hub: hub.clone(),
        }
    }

    /// Number of tokens waiting in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slot.receiver.len()
    }

    fn ensure_alive(&self) -> ChannelResult<()> {
        if self.slot.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ChannelError::UnknownQueue(self.name.clone()))
        }
    }
}

impl CommandChannel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn publish(&mut self, token: &str) -> ChannelResult<()> {
        validate_token(token)?;
        self.ensure_alive()?;
        self.slot
            .sender
            .send(token.to_string())
            .map_err(|_| ChannelError::UnknownQueue(self.name.clone()))
    }

    fn poll(&mut self) -> ChannelResult<Option<String>> {
        self.ensure_alive()?;
        match self.slot.receiver.try_recv() {
            Ok(token) => Ok(Some(token)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::UnknownQueue(self.name.clone())),
        }
    }

    fn release(&mut self) -> ChannelResult<()> {
        self.hub.delete(&self.name);
        tracing::debug!("released in-process queue {}", self.name);
        Ok(())
    }
}
