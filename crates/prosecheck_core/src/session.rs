//! Check request bookkeeping.

use std::sync::Arc;

/// Monotonically increasing check request id.
pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Succeeded,
    Failed,
    /// A newer request started before this one completed.
    Superseded,
}

/// One check request and the text it was made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSession {
    pub id: SessionId,
    pub text: Arc<str>,
    pub format: String,
    pub status: SessionStatus,
}

/// Tracks the latest request; outcomes of older ones are not applied.
#[derive(Debug, Default)]
pub struct SessionTracker {
    next_id: SessionId,
    latest: Option<CheckSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session, superseding any pending one.
    pub fn begin(&mut self, text: impl Into<Arc<str>>, format: impl Into<String>) -> CheckSession {
        self.next_id += 1;
        let session = CheckSession {
            id: self.next_id,
            text: text.into(),
            format: format.into(),
            status: SessionStatus::Pending,
        };
        self.latest = Some(session.clone());
        session
    }

    /// The pending session, if any.
    pub fn latest(&self) -> Option<&CheckSession> {
        self.latest.as_ref()
    }

    /// Records the outcome of `id`.
    ///
    /// Returns the completed session when it is still the latest one, which
    /// hands it off and clears it. Otherwise returns [`SessionStatus::Superseded`].
    pub fn complete(&mut self, id: SessionId, succeeded: bool) -> Result<CheckSession, SessionStatus> {
        match self.latest.take_if(|session| session.id == id) {
            Some(mut session) => {
                session.status = if succeeded {
                    SessionStatus::Succeeded
                } else {
                    SessionStatus::Failed
                };
                Ok(session)
            }
            None => Err(SessionStatus::Superseded),
        }
    }

    /// Forgets the pending session.
    pub fn clear(&mut self) {
        self.latest = None;
    }
}
