//! Viewer registry and best-effort change broadcast.
//!
//! Each connected web viewer owns a bounded queue. Broadcasting never waits:
//! a viewer whose queue is closed or full is removed from the registry, which
//! ends its socket so the page reconnects and re-fetches `/data`.

mod event;

pub use event::{ChangeEvent, ViewerMessage};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};

pub const DEFAULT_VIEWER_BUFFER: usize = 64;

struct Registry {
    next_id: u64,
    viewers: HashMap<u64, mpsc::Sender<Arc<str>>>,
}

#[derive(Clone)]
pub struct Notifier {
    registry: Arc<Mutex<Registry>>,
    buffer: usize,
}

impl Notifier {
    pub fn new(buffer: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 1,
                viewers: HashMap::new(),
            })),
            buffer: buffer.max(1),
        }
    }

    /// Register a viewer; it is unregistered when the returned handle drops
    pub fn subscribe(&self) -> Viewer {
        let (sender, receiver) = mpsc::channel(self.buffer);
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id = registry.next_id.saturating_add(1);
        registry.viewers.insert(id, sender);
        tracing::debug!(viewer = id, viewers = registry.viewers.len(), "Viewer connected");

        Viewer {
            id,
            receiver,
            registry: Arc::clone(&self.registry),
        }
    }

    /// Queue `event` for every viewer. Returns how many accepted it.
    pub fn broadcast(&self, event: ChangeEvent) -> usize {
        let payload: Arc<str> = match event.to_json() {
            Ok(json) => json.into(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize change event");
                return 0;
            }
        };

        let mut registry = lock(&self.registry);
        let mut dropped = Vec::new();
        let mut delivered = 0;
        for (id, sender) in &registry.viewers {
            match sender.try_send(Arc::clone(&payload)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(viewer = id, "Viewer lagging, disconnecting");
                    dropped.push(*id);
                }
                Err(TrySendError::Closed(_)) => dropped.push(*id),
            }
        }
        for id in dropped {
            registry.viewers.remove(&id);
        }
        delivered
    }

    pub fn viewer_count(&self) -> usize {
        lock(&self.registry).viewers.len()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWER_BUFFER)
    }
}

/// Receiving end of one viewer's queue
pub struct Viewer {
    id: u64,
    receiver: mpsc::Receiver<Arc<str>>,
    registry: Arc<Mutex<Registry>>,
}

impl Viewer {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next serialized event; `None` once the viewer has been dropped from the registry
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.receiver.recv().await
    }

    /// Already-queued event, if any
    pub fn try_recv(&mut self) -> Option<Arc<str>> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        let mut registry = lock(&self.registry);
        if registry.viewers.remove(&self.id).is_some() {
            tracing::debug!(viewer = self.id, viewers = registry.viewers.len(), "Viewer disconnected");
        }
    }
}

// A panic while holding the lock leaves the map itself consistent
fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
