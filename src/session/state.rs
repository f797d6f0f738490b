use crate::types::ResultSet;
use crate::Error;
use std::sync::Arc;

/// Whether any submission is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Pending {
        /// Submissions issued but not yet resolved.
        in_flight: usize,
    },
}

impl SessionState {
    pub(crate) fn from_in_flight(in_flight: usize) -> Self {
        if in_flight == 0 {
            SessionState::Idle
        } else {
            SessionState::Pending { in_flight }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Pending { .. })
    }
}

/// Everything a rendering layer needs to redraw.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub results: Arc<ResultSet>,
    /// Failure of the most recent submission that owned the display, cleared on success.
    pub last_error: Option<Error>,
    /// Number of responses applied so far; bumps whenever `results` is replaced.
    pub generation: u64,
}

/// How one submission ended, from the session's point of view.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The response replaced the displayed result set.
    Applied(Arc<ResultSet>),
    /// A response arrived but a newer submission had been issued; it was discarded.
    Superseded,
    /// The request was cancelled before a response arrived.
    Cancelled,
}

impl SubmitOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SubmitOutcome::Applied(_))
    }
}
