//! At most one in-flight task, shared by every caller that arrives while it
//! is unresolved.

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// The task behind a flight ended without producing a value (it panicked or
/// the runtime shut down).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("in-flight task ended: {0}")]
pub struct FlightAborted(pub String);

/// Future handed to every caller of one flight.
pub type Flight<T> = Shared<BoxFuture<'static, Result<T, FlightAborted>>>;

struct Slot<T: Clone> {
    generation: u64,
    flight: Flight<T>,
}

struct State<T: Clone> {
    next_generation: u64,
    current: Option<Slot<T>>,
}

/// Single-flight gate.
///
/// The work runs on its own tokio task, so dropping a caller's future does
/// not cancel it for the others. The slot is cleared when the task finishes,
/// successfully or not, and the next call starts a new flight.
pub struct SingleFlight<T: Clone> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                next_generation: 0,
                current: None,
            })),
        }
    }

    /// Joins the in-flight task, or starts one from `make`.
    ///
    /// `make` is only called when no task is in flight. Must be called from
    /// within a tokio runtime.
    pub fn run<F, Fut>(&self, make: F) -> Flight<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        // Held until the slot is stored so the task cannot clear it first.
        let mut state = self.state.lock();

        if let Some(slot) = &state.current {
            debug!("Joining in-flight task #{}", slot.generation);
            return slot.flight.clone();
        }

        let generation = state.next_generation;
        state.next_generation += 1;

        let guard = ClearOnDrop {
            state: Arc::clone(&self.state),
            generation,
        };
        let work = make();
        let handle = tokio::spawn(async move {
            let _guard = guard;
            work.await
        });

        let flight = async move {
            handle
                .await
                .map_err(|e| FlightAborted(e.to_string()))
        }
        .boxed()
        .shared();

        debug!("Started task #{}", generation);
        state.current = Some(Slot {
            generation,
            flight: flight.clone(),
        });
        flight
    }

    /// Returns true while a task is unresolved.
    pub fn is_in_flight(&self) -> bool {
        self.state.lock().current.is_some()
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Frees the slot when the task ends, including by panic.
struct ClearOnDrop<T: Clone> {
    state: Arc<Mutex<State<T>>>,
    generation: u64,
}

impl<T: Clone> Drop for ClearOnDrop<T> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state
            .current
            .as_ref()
            .is_some_and(|slot| slot.generation == self.generation)
        {
            state.current = None;
        }
    }
}
