//! # prosecheck_engine
//!
//! Adapters over the Vale prose linter.
//!
//! Two transports implement [`DiagnosticEngine`]:
//! - [`RemoteEngine`] posts the document to a running Vale Server
//! - [`LocalEngine`] pipes the document through the Vale binary
//!
//! Both return [`AlertsByFormat`], keyed by the format of the request.

mod alert;
mod engine;
mod error;
pub mod local;
pub mod remote;

pub use alert::{Alert, AlertAction, AlertsByFormat, Severity, UnknownSeverity};
pub use engine::DiagnosticEngine;
pub use error::EngineError;
pub use local::LocalEngine;
pub use remote::{DEFAULT_SERVER_URL, RemoteEngine};
