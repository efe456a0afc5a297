//! # prosecheck_core
//!
//! Check orchestration for prosecheck.
//!
//! This crate provides:
//! - [`CheckRunner`], running at most one check at a time per engine
//! - [`EventBus`], single-subscriber topics between host and result view
//! - [`AnnotationSynchronizer`], keeping editor decorations in step with alerts
//! - [`ResultView`] and [`HostBridge`], the two ends of a check round trip
//! - [`Settings`], selecting the engine transport
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prosecheck_core::{CheckRunner, EventBus, HostBridge, ResultView, Settings, TextSurface};
//!
//! let settings = Settings::from_file("settings.json")?;
//! let runner = Arc::new(CheckRunner::from_settings(&settings, &data_dir)?);
//!
//! let bus = Arc::new(EventBus::new());
//! let bridge = HostBridge::new(Arc::clone(&bus), TextSurface::new(&text));
//! let view = ResultView::open(runner, bus);
//!
//! bridge.check_document(&text, ".md");
//! let state = view.settled().await;
//! ```

pub mod annotations;
mod bridge;
mod error;
pub mod events;
pub mod position;
mod runner;
pub mod session;
mod settings;
pub mod single_flight;
mod surface;
mod view;

pub use annotations::{
    AnnotationSynchronizer, DecorationId, EditorMode, EditorSurface, HIGHLIGHT_CLASS, Marker,
    MarkerKind, PointerOutcome, UNDERLINE_CLASS, marker_class,
};
pub use bridge::HostBridge;
pub use error::{CheckError, SettingsError};
pub use events::{AlertBatch, AlertId, CheckRequest, EventBus, Subscription, Topic};
pub use position::{TextPosition, TextRange};
pub use runner::{CheckOutcome, CheckRunner};
pub use session::{CheckSession, SessionId, SessionStatus, SessionTracker};
pub use settings::{
    CliSettings, EngineKind, EnginePaths, ServerSettings, Settings, default_data_dir,
    managed_binary_path, managed_config_path,
};
pub use surface::TextSurface;
pub use view::{Report, ResultView, ViewState};

pub use prosecheck_engine::{Alert, AlertsByFormat, Severity};
