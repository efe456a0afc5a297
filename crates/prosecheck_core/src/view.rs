//! Result view controller.
//!
//! Subscribes to check requests, runs them, and publishes the outcome both
//! as view state and as an `alerts` batch for the editor. Rendering of the
//! state is left to the front end.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use prosecheck_engine::Alert;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::events::{AlertBatch, AlertId, CheckRequest, EventBus, Subscription};
use crate::runner::{CheckOutcome, CheckRunner};
use crate::session::{SessionId, SessionStatus, SessionTracker};

/// What the view currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Alerts(AlertBatch),
    /// A failure notice for the user.
    Failure(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub loading: bool,
    pub report: Option<Report>,
    /// Vale is not set up; the front end should offer to install it.
    pub onboarding: bool,
    pub highlighted: Option<AlertId>,
}

impl ViewState {
    /// Alerts of the current report, if it holds any.
    pub fn alerts(&self) -> Option<&[Alert]> {
        match &self.report {
            Some(Report::Alerts(batch)) => Some(&*batch.alerts),
            _ => None,
        }
    }

    /// The alert that is highlighted, resolved against the current report.
    pub fn highlighted_alert(&self) -> Option<&Alert> {
        let id = self.highlighted?;
        match &self.report {
            Some(Report::Alerts(batch)) if batch.session == id.session => batch.get(id.index),
            _ => None,
        }
    }

    /// True once a check has settled one way or another.
    pub fn is_settled(&self) -> bool {
        !self.loading && (self.report.is_some() || self.onboarding)
    }
}

struct Inner {
    runner: Arc<CheckRunner>,
    bus: Arc<EventBus>,
    runtime: Handle,
    sessions: Mutex<SessionTracker>,
    cancelled: AtomicBool,
    state: watch::Sender<ViewState>,
}

/// Drives checks requested over the bus and holds the resulting state.
pub struct ResultView {
    inner: Arc<Inner>,
    subscriptions: Vec<Subscription>,
}

impl ResultView {
    /// Subscribes to the bus and announces `ready`.
    ///
    /// Must be called from within a tokio runtime; checks are spawned on it.
    pub fn open(runner: Arc<CheckRunner>, bus: Arc<EventBus>) -> Self {
        let inner = Arc::new(Inner {
            runner,
            bus: Arc::clone(&bus),
            runtime: Handle::current(),
            sessions: Mutex::new(SessionTracker::new()),
            cancelled: AtomicBool::new(false),
            state: watch::Sender::new(ViewState::default()),
        });

        let on_check = Arc::clone(&inner);
        let on_select = Arc::clone(&inner);
        let on_deselect = Arc::clone(&inner);
        let subscriptions = vec![
            bus.check.subscribe(move |request| Inner::start_check(&on_check, request)),
            bus.select_alert.subscribe(move |id| {
                on_select.state.send_if_modified(|state| {
                    let known = matches!(
                        &state.report,
                        Some(Report::Alerts(batch)) if batch.session == id.session
                    );
                    if known && state.highlighted != Some(id) {
                        state.highlighted = Some(id);
                        true
                    } else {
                        false
                    }
                });
            }),
            bus.deselect_alert.subscribe(move |()| {
                on_deselect
                    .state
                    .send_if_modified(|state| state.highlighted.take().is_some());
            }),
        ];

        bus.ready.dispatch(());

        Self {
            inner,
            subscriptions,
        }
    }

    pub fn state(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Receives every state change.
    pub fn watch(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Waits until the current check has settled.
    pub async fn settled(&self) -> ViewState {
        let mut rx = self.watch();
        match rx.wait_for(ViewState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Unsubscribes and discards the outcome of any check still running.
    ///
    /// The engine call itself is left to finish.
    pub fn close(&mut self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.sessions.lock().clear();
        self.subscriptions.clear();
        debug!("Result view closed");
    }
}

impl Drop for ResultView {
    fn drop(&mut self) {
        self.close();
    }
}

impl Inner {
    fn start_check(this: &Arc<Self>, request: CheckRequest) {
        if this.cancelled.load(Ordering::SeqCst) {
            return;
        }

        let session = this
            .sessions
            .lock()
            .begin(request.text.as_str(), request.format.as_str());
        this.state.send_modify(|state| state.loading = true);

        let inner = Arc::clone(this);
        this.runtime.spawn(async move {
            let outcome = inner.runner.run(&session.text, &session.format).await;
            inner.finish(session.id, outcome);
        });
    }

    fn finish(&self, id: SessionId, outcome: CheckOutcome) {
        if self.cancelled.load(Ordering::SeqCst) {
            debug!("Discarding result of check {} after close", id);
            return;
        }

        let completed = self.sessions.lock().complete(id, outcome.is_ok());
        if let Err(SessionStatus::Superseded) = completed {
            debug!("Check {} was superseded", id);
            return;
        }

        match outcome {
            Ok(alerts) => {
                let batch = AlertBatch::new(id, alerts.first().to_vec());
                // Editor first, so a settled view implies drawn markers.
                self.bus.alerts.dispatch(batch.clone());
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.onboarding = false;
                    state.highlighted = None;
                    state.report = Some(Report::Alerts(batch));
                });
            }
            Err(err) => {
                warn!("Check failed: {}", err);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.highlighted = None;
                    if err.needs_onboarding() {
                        state.onboarding = true;
                        state.report = None;
                    } else {
                        state.onboarding = false;
                        state.report = Some(Report::Failure(err.user_message()));
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use prosecheck_engine::{AlertsByFormat, DiagnosticEngine, EngineError, LocalEngine};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct EchoEngine {
        delay: Duration,
        refuse: bool,
    }

    #[async_trait]
    impl DiagnosticEngine for EchoEngine {
        async fn vale(&self, text: &str, format: &str) -> Result<AlertsByFormat, EngineError> {
            tokio::time::sleep(self.delay).await;
            if self.refuse {
                return Err(EngineError::ConnectionRefused("localhost:7777".into()));
            }
            let mut alerts = AlertsByFormat::new();
            alerts.insert(format, vec![Alert::new("Vale.Spelling", text, 1, [1, 2])]);
            Ok(alerts)
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    fn runner(delay_ms: u64, refuse: bool) -> Arc<CheckRunner> {
        Arc::new(CheckRunner::new(Arc::new(EchoEngine {
            delay: Duration::from_millis(delay_ms),
            refuse,
        })))
    }

    #[tokio::test]
    async fn test_open_announces_ready() {
        let bus = Arc::new(EventBus::new());
        let readies = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&readies);
        let _ready = bus.ready.subscribe(move |()| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let _view = ResultView::open(runner(1, false), Arc::clone(&bus));
        assert_eq!(readies.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_check_publishes_alerts() {
        let bus = Arc::new(EventBus::new());
        let published = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&published);
        let _alerts = bus.alerts.subscribe(move |batch| {
            *sink.lock() = Some(batch);
        });
        let view = ResultView::open(runner(1, false), Arc::clone(&bus));

        bus.check.dispatch(CheckRequest::new("Helo", ".md"));
        assert!(view.state().loading);
        let state = view.settled().await;

        assert_eq!(state.alerts().unwrap()[0].message, "Helo");
        let batch = published.lock().clone().unwrap();
        assert_eq!(Some(Report::Alerts(batch)), state.report);
    }

    #[tokio::test]
    async fn test_connection_refused_notice() {
        let bus = Arc::new(EventBus::new());
        let view = ResultView::open(runner(1, true), Arc::clone(&bus));

        bus.check.dispatch(CheckRequest::new("text", ".md"));
        let state = view.settled().await;

        assert_eq!(
            state.report,
            Some(Report::Failure("Couldn't connect to Vale Server.".to_string()))
        );
        assert!(!state.onboarding);
    }

    #[tokio::test]
    async fn test_missing_binary_routes_to_onboarding() {
        let dir = tempfile::TempDir::new().unwrap();
        let runner = Arc::new(CheckRunner::local(LocalEngine::new(
            dir.path().join("vale"),
            dir.path().join(".vale.ini"),
        )));
        let bus = Arc::new(EventBus::new());
        let view = ResultView::open(runner, Arc::clone(&bus));

        bus.check.dispatch(CheckRequest::new("text", ".md"));
        let state = view.settled().await;

        assert!(state.onboarding);
        assert_eq!(state.report, None);
    }

    #[tokio::test]
    async fn test_select_and_deselect() {
        let bus = Arc::new(EventBus::new());
        let view = ResultView::open(runner(1, false), Arc::clone(&bus));
        bus.check.dispatch(CheckRequest::new("Helo", ".md"));
        let state = view.settled().await;
        let Some(Report::Alerts(batch)) = state.report else {
            panic!("Expected alerts");
        };

        bus.select_alert.dispatch(batch.id(0));
        assert_eq!(view.state().highlighted_alert().unwrap().message, "Helo");

        // Ids from another session are ignored.
        bus.select_alert.dispatch(AlertId { session: batch.session + 1, index: 0 });
        assert_eq!(view.state().highlighted, Some(batch.id(0)));

        bus.deselect_alert.dispatch(());
        assert_eq!(view.state().highlighted, None);
    }

    #[tokio::test]
    async fn test_closed_view_discards_result() {
        let bus = Arc::new(EventBus::new());
        let published = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&published);
        let _alerts = bus.alerts.subscribe(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        let runner = runner(20, false);
        let mut view = ResultView::open(Arc::clone(&runner), Arc::clone(&bus));

        bus.check.dispatch(CheckRequest::new("text", ".md"));
        view.close();
        assert!(view.is_cancelled());
        assert!(!bus.check.has_subscriber());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!runner.is_running());
        assert_eq!(published.load(Ordering::SeqCst), 0);
        assert!(view.state().report.is_none());
    }

    #[tokio::test]
    async fn test_superseded_check_is_not_applied() {
        let bus = Arc::new(EventBus::new());
        let published = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&published);
        let _alerts = bus.alerts.subscribe(move |batch: AlertBatch| {
            sink.lock().push(batch.session);
        });
        let view = ResultView::open(runner(20, false), Arc::clone(&bus));

        bus.check.dispatch(CheckRequest::new("first", ".md"));
        bus.check.dispatch(CheckRequest::new("second", ".md"));
        let state = view.settled().await;
        // Let the first session's task finish too.
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Both joined one engine call; only the latest session is applied.
        assert_eq!(*published.lock(), vec![2]);
        let Some(Report::Alerts(batch)) = state.report else {
            panic!("Expected alerts");
        };
        assert_eq!(batch.session, 2);
        assert_eq!(batch.alerts[0].message, "first");
    }
}
