//! Host side of the event bus.
//!
//! Forwards check requests once the result view is ready, draws incoming
//! alert batches on the editor surface, and turns editor clicks into
//! selection events.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::annotations::{AnnotationSynchronizer, EditorSurface, PointerOutcome};
use crate::events::{AlertId, CheckRequest, EventBus, Subscription};

struct Shared<S> {
    surface: S,
    sync: AnnotationSynchronizer,
}

#[derive(Default)]
struct Pending {
    ready: bool,
    request: Option<CheckRequest>,
}

/// Connects an editor surface to the bus.
pub struct HostBridge<S> {
    bus: Arc<EventBus>,
    shared: Arc<Mutex<Shared<S>>>,
    pending: Arc<Mutex<Pending>>,
    subscriptions: Vec<Subscription>,
}

impl<S> HostBridge<S>
where
    S: EditorSurface + Send + 'static,
{
    pub fn new(bus: Arc<EventBus>, surface: S) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            surface,
            sync: AnnotationSynchronizer::new(),
        }));
        let pending = Arc::new(Mutex::new(Pending::default()));

        let on_alerts = Arc::clone(&shared);
        let on_ready = Arc::clone(&pending);
        let ready_bus = Arc::clone(&bus);
        let subscriptions = vec![
            bus.alerts.subscribe(move |batch| {
                let mut shared = on_alerts.lock();
                let Shared { surface, sync } = &mut *shared;
                sync.apply_alerts(surface, &batch);
            }),
            bus.ready.subscribe(move |()| {
                let request = {
                    let mut pending = on_ready.lock();
                    pending.ready = true;
                    pending.request.take()
                };
                if let Some(request) = request {
                    debug!("View ready, sending queued check");
                    ready_bus.check.dispatch(request);
                }
            }),
        ];

        Self {
            bus,
            shared,
            pending,
            subscriptions,
        }
    }

    /// Requests a check of the current document.
    ///
    /// Queued until a view announces `ready`; a newer request replaces a
    /// queued one. A closed view puts the bridge back into waiting.
    pub fn check_document(&self, text: impl Into<String>, format: impl Into<String>) {
        let request = CheckRequest::new(text, format);
        {
            let mut pending = self.pending.lock();
            if !pending.ready || !self.bus.check.has_subscriber() {
                if pending.ready {
                    debug!("View went away, queueing check until the next ready");
                }
                pending.ready = false;
                pending.request = Some(request);
                return;
            }
        }
        self.bus.check.dispatch(request);
    }

    /// The user picked an alert in the result list.
    pub fn on_alert_click(&self, id: AlertId) {
        let selected = {
            let mut shared = self.shared.lock();
            let Shared { surface, sync } = &mut *shared;
            sync.select_from_list(surface, id)
        };
        if selected {
            self.bus.select_alert.dispatch(id);
        }
    }

    /// The pointer was released over the editor at `(x, y)`.
    pub fn on_pointer_up(&self, x: f64, y: f64) -> PointerOutcome {
        let outcome = {
            let mut shared = self.shared.lock();
            let Shared { surface, sync } = &mut *shared;
            sync.on_pointer_up(surface, x, y)
        };
        match outcome {
            PointerOutcome::Selected(id) => {
                self.bus.select_alert.dispatch(id);
            }
            PointerOutcome::Deselected => {
                self.bus.deselect_alert.dispatch(());
            }
            PointerOutcome::Ignored => {}
        }
        outcome
    }

    /// Runs `f` with the surface and synchronizer.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S, &AnnotationSynchronizer) -> R) -> R {
        let mut shared = self.shared.lock();
        let Shared { surface, sync } = &mut *shared;
        f(surface, sync)
    }

    /// Unsubscribes and removes every decoration.
    pub fn teardown(&mut self) {
        self.subscriptions.clear();
        let mut shared = self.shared.lock();
        let Shared { surface, sync } = &mut *shared;
        sync.clear(surface);
    }
}

impl<S> Drop for HostBridge<S> {
    fn drop(&mut self) {
        self.subscriptions.clear();
    }
}
