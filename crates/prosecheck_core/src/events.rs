//! Synchronous topic dispatch between the host bridge and the result view.
//!
//! Every topic has at most one subscriber. Subscribing returns a
//! [`Subscription`] that unregisters when dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use prosecheck_engine::Alert;
use tracing::{debug, warn};

use crate::session::SessionId;

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

struct Registration<T> {
    id: u64,
    handler: Handler<T>,
}

/// A named channel with a single consumer.
pub struct Topic<T> {
    name: &'static str,
    slot: Arc<Mutex<Option<Registration<T>>>>,
    next_id: AtomicU64,
}

impl<T: 'static> Topic<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registers `handler`, replacing any previous subscriber.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let previous = self.slot.lock().replace(Registration {
            id,
            handler: Arc::new(handler),
        });
        if previous.is_some() {
            debug!("Replaced subscriber for '{}'", self.name);
        } else {
            debug!("Registered subscriber for '{}'", self.name);
        }

        let slot = Arc::clone(&self.slot);
        let name = self.name;
        Subscription {
            unregister: Some(Box::new(move || {
                let mut slot = slot.lock();
                // A newer registration is left alone.
                if slot.as_ref().is_some_and(|r| r.id == id) {
                    *slot = None;
                    debug!("Unregistered subscriber for '{}'", name);
                }
            })),
        }
    }

    pub fn has_subscriber(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Delivers `payload` on the calling thread. Returns whether anyone
    /// received it.
    pub fn dispatch(&self, payload: T) -> bool {
        // Released before the call so handlers may dispatch or subscribe.
        let handler = self.slot.lock().as_ref().map(|r| Arc::clone(&r.handler));

        match handler {
            Some(handler) => {
                debug!("Dispatching '{}'", self.name);
                handler(payload);
                true
            }
            None => {
                warn!("No subscriber for '{}'", self.name);
                false
            }
        }
    }
}

/// Unregisters its handler on drop.
#[must_use = "dropping a Subscription unregisters the handler"]
pub struct Subscription {
    unregister: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unregister.is_some())
            .finish()
    }
}

/// A request to check a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    pub text: String,
    /// File extension including the dot, e.g. `.md`.
    pub format: String,
}

impl CheckRequest {
    pub fn new(text: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: format.into(),
        }
    }
}

/// Index of an alert in the table of one check session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertId {
    pub session: SessionId,
    pub index: usize,
}

/// The alert table produced by one check session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertBatch {
    pub session: SessionId,
    pub alerts: Arc<[Alert]>,
}

impl AlertBatch {
    pub fn new(session: SessionId, alerts: impl Into<Arc<[Alert]>>) -> Self {
        Self {
            session,
            alerts: alerts.into(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Alert> {
        self.alerts.get(index)
    }

    pub fn id(&self, index: usize) -> AlertId {
        AlertId {
            session: self.session,
            index,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = (AlertId, &Alert)> {
        self.alerts
            .iter()
            .enumerate()
            .map(|(index, alert)| (self.id(index), alert))
    }
}

/// The topics connecting the host bridge to the result view.
pub struct EventBus {
    /// The view is ready to receive check requests.
    pub ready: Topic<()>,
    /// Check the given document.
    pub check: Topic<CheckRequest>,
    /// A check produced a new alert table.
    pub alerts: Topic<AlertBatch>,
    /// An alert was selected in the document or the list.
    pub select_alert: Topic<AlertId>,
    /// The selection was cleared.
    pub deselect_alert: Topic<()>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            ready: Topic::new("ready"),
            check: Topic::new("check"),
            alerts: Topic::new("alerts"),
            select_alert: Topic::new("select-alert"),
            deselect_alert: Topic::new("deselect-alert"),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
