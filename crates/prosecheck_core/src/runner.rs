//! Check execution behind a single-flight gate.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use prosecheck_engine::{AlertsByFormat, DiagnosticEngine, LocalEngine, RemoteEngine};
use tracing::{debug, info};

use crate::settings::{EngineKind, Settings};
use crate::single_flight::SingleFlight;
use crate::{CheckError, SettingsError};

/// Settled result of one check, shared by every caller that joined it.
pub type CheckOutcome = Result<Arc<AlertsByFormat>, Arc<CheckError>>;

/// Files that must exist before the local engine is started.
#[derive(Debug, Clone)]
struct Preconditions {
    binary: PathBuf,
    config: PathBuf,
}

impl Preconditions {
    async fn verify(&self) -> Result<(), CheckError> {
        if !is_file(&self.binary).await {
            return Err(CheckError::MissingEngineBinary(self.binary.clone()));
        }
        if !is_file(&self.config).await {
            return Err(CheckError::MissingConfigFile(self.config.clone()));
        }
        Ok(())
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// Runs checks against one engine, at most one at a time.
///
/// A call made while a check is unresolved receives that check's outcome
/// instead of starting another. Engine errors are passed through; nothing is
/// retried.
pub struct CheckRunner {
    engine: Arc<dyn DiagnosticEngine>,
    preconditions: Option<Preconditions>,
    timeout: Option<Duration>,
    flight: SingleFlight<CheckOutcome>,
}

impl CheckRunner {
    /// Wraps an engine with no preconditions.
    pub fn new(engine: Arc<dyn DiagnosticEngine>) -> Self {
        Self {
            engine,
            preconditions: None,
            timeout: None,
            flight: SingleFlight::new(),
        }
    }

    /// Wraps a local engine, verifying its binary and config before each run.
    pub fn local(engine: LocalEngine) -> Self {
        let preconditions = Preconditions {
            binary: engine.binary().to_path_buf(),
            config: engine.config().to_path_buf(),
        };
        Self {
            preconditions: Some(preconditions),
            ..Self::new(Arc::new(engine))
        }
    }

    /// Builds the runner the settings select.
    pub fn from_settings(settings: &Settings, data_dir: &Path) -> Result<Self, SettingsError> {
        let runner = match settings.kind {
            EngineKind::Server => {
                info!("Using Vale Server at {}", settings.server.url);
                Self::new(Arc::new(RemoteEngine::new(&settings.server.url)?))
            }
            EngineKind::Cli => {
                let paths = settings.engine_paths(data_dir);
                info!("Using Vale binary at {}", paths.binary.display());
                Self::local(LocalEngine::new(paths.binary, paths.config))
            }
        };
        Ok(runner.with_timeout(settings.check_timeout()))
    }

    /// Bounds each check. `None` waits for the engine indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Returns true while a check is unresolved.
    pub fn is_running(&self) -> bool {
        self.flight.is_in_flight()
    }

    /// Checks `text` as a document of type `format`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn run(&self, text: &str, format: &str) -> CheckOutcome {
        let engine = Arc::clone(&self.engine);
        let preconditions = self.preconditions.clone();
        let timeout = self.timeout;
        let text = text.to_string();
        let format = format.to_string();

        let flight = self.flight.run(move || async move {
            let started = Instant::now();
            let result = execute(engine.as_ref(), preconditions, timeout, &text, &format).await;
            debug!(
                "{} check of {} bytes finished in {:?}",
                engine.name(),
                text.len(),
                started.elapsed()
            );
            result.map(Arc::new).map_err(Arc::new)
        });

        flight
            .await
            .unwrap_or_else(|e| Err(Arc::new(CheckError::Aborted(e.0))))
    }
}

async fn execute(
    engine: &dyn DiagnosticEngine,
    preconditions: Option<Preconditions>,
    timeout: Option<Duration>,
    text: &str,
    format: &str,
) -> Result<AlertsByFormat, CheckError> {
    if let Some(preconditions) = preconditions {
        preconditions.verify().await?;
    }

    let call = engine.vale(text, format);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| CheckError::TimedOut(limit))?
            .map_err(CheckError::from),
        None => Ok(call.await?),
    }
}
