//! The engine abstraction shared by both transports.

use async_trait::async_trait;

use crate::alert::AlertsByFormat;
use crate::error::EngineError;

/// A backend able to lint a document.
///
/// Implementations are opaque: they receive the full text and a format hint
/// (an extension such as `.md`) and return alerts keyed by format.
#[async_trait]
pub trait DiagnosticEngine: Send + Sync {
    /// Lints `text` as a document of type `format`.
    async fn vale(&self, text: &str, format: &str) -> Result<AlertsByFormat, EngineError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
