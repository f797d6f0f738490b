//! 会话状态机：显式的 Idle / Pending 状态，以及重叠提交时的取代策略。
//!
//! # Session Module
//!
//! [`InferenceSession`] owns the result set a form displays and runs every
//! submission through an explicit two-state machine:
//!
//! ```text
//!   Idle ──submit──▶ Pending{n} ──response/failure (n → 0)──▶ Idle
//!                       │  ▲
//!                       └──┘ submit / response while n > 1
//! ```
//!
//! - A successful response replaces the result set wholesale.
//! - A failure leaves the previous result set untouched and is recorded as
//!   `last_error` and returned to the caller.
//! - Overlapping submissions follow the configured [`SupersedePolicy`]:
//!   `CancelSuperseded` cancels the older request so only the newest can
//!   update the display, `LastArrivalWins` lets them race.
//!
//! Observers subscribe to [`SessionSnapshot`] updates through a `watch` channel.

mod state;


pub use state::{SessionSnapshot, SessionState, SubmitOutcome};

use crate::backend::InferenceBackend;
use crate::client::InferenceClient;
use crate::config::SupersedePolicy;
use crate::types::{ResultSet, SymptomQuery};
use crate::{FailureKind, Result};
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

struct Inner {
    next_seq: u64,
    /// Sequence number of the newest submission issued.
    latest_seq: u64,
    in_flight: usize,
    /// Token of the newest submission, cancelled when a newer one arrives.
    current: Option<(u64, CancellationToken)>,
    /// Parent of every request token; replaced after `cancel_pending`.
    parent: CancellationToken,
    last_error: Option<crate::Error>,
    generation: u64,
}

pub struct InferenceSession {
    backend: Arc<dyn InferenceBackend>,
    policy: SupersedePolicy,
    results: ArcSwap<ResultSet>,
    inner: Mutex<Inner>,
    updates: watch::Sender<SessionSnapshot>,
}

impl InferenceSession {
    pub fn new(backend: Arc<dyn InferenceBackend>, policy: SupersedePolicy) -> Self {
        let results = Arc::new(ResultSet::default());
        let (updates, _) = watch::channel(SessionSnapshot {
            state: SessionState::Idle,
            results: results.clone(),
            last_error: None,
            generation: 0,
        });
        Self {
            backend,
            policy,
            results: ArcSwap::new(results),
            inner: Mutex::new(Inner {
                next_seq: 0,
                latest_seq: 0,
                in_flight: 0,
                current: None,
                parent: CancellationToken::new(),
                last_error: None,
                generation: 0,
            }),
            updates,
        }
    }

    /// Session over an HTTP client, using the client's configured supersede policy.
    pub fn from_client(client: InferenceClient) -> Self {
        let policy = client.config().supersede_policy;
        Self::new(Arc::new(client), policy)
    }

    pub fn policy(&self) -> SupersedePolicy {
        self.policy
    }

    // Inner holds plain counters and tokens, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_locked(&self, inner: &Inner) -> SessionSnapshot {
        SessionSnapshot {
            state: SessionState::from_in_flight(inner.in_flight),
            results: self.results.load_full(),
            last_error: inner.last_error.clone(),
            generation: inner.generation,
        }
    }

    fn publish(&self, inner: &Inner) {
        self.updates.send_replace(self.snapshot_locked(inner));
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        self.snapshot_locked(&inner)
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_in_flight(self.lock().in_flight)
    }

    /// The result set currently on display.
    pub fn results(&self) -> Arc<ResultSet> {
        self.results.load_full()
    }

    pub fn last_error(&self) -> Option<crate::Error> {
        self.lock().last_error.clone()
    }

    /// Receive a fresh [`SessionSnapshot`] on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Cancel every outstanding submission. Results on display are kept.
    pub fn cancel_pending(&self) {
        let mut inner = self.lock();
        inner.parent.cancel();
        inner.parent = CancellationToken::new();
        inner.current = None;
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let mut inner = self.lock();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.latest_seq = seq;
        inner.in_flight += 1;

        let token = inner.parent.child_token();
        if let Some((prev_seq, prev)) = inner.current.replace((seq, token.clone())) {
            if self.policy == SupersedePolicy::CancelSuperseded {
                debug!(superseded = prev_seq, by = seq, "cancelling superseded submission");
                prev.cancel();
            }
        }
        self.publish(&inner);
        (seq, token)
    }

    fn finish(&self, seq: u64, result: Result<ResultSet>) -> Result<SubmitOutcome> {
        let mut inner = self.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        if matches!(inner.current, Some((s, _)) if s == seq) {
            inner.current = None;
        }
        let is_latest = seq == inner.latest_seq;
        let owns_display = is_latest || self.policy == SupersedePolicy::LastArrivalWins;

        let outcome = match result {
            Ok(set) if owns_display => {
                let set = Arc::new(set);
                self.results.store(set.clone());
                inner.generation += 1;
                inner.last_error = None;
                Ok(SubmitOutcome::Applied(set))
            }
            Ok(_) => {
                debug!(seq, latest = inner.latest_seq, "discarding stale response");
                Ok(SubmitOutcome::Superseded)
            }
            Err(e) if e.failure_kind() == Some(FailureKind::Cancelled) => {
                Ok(SubmitOutcome::Cancelled)
            }
            Err(e) => {
                warn!(seq, error = %e, "submission failed, keeping previous results");
                if owns_display {
                    inner.last_error = Some(e.clone());
                }
                Err(e)
            }
        };

        self.publish(&inner);
        outcome
    }

    /// Submit a query and apply its response according to the session policy.
    ///
    /// Returns `Err` only for failures of this submission; the previous result
    /// set stays on display in that case.
    pub async fn submit(&self, query: impl Into<SymptomQuery>) -> Result<SubmitOutcome> {
        let query = query.into();
        let (seq, token) = self.begin();
        let mut guard = InFlight {
            session: self,
            seq,
            resolved: false,
        };
        let result = self.backend.infer(query, token).await;
        guard.resolved = true;
        self.finish(seq, result)
    }
}

/// Resolves a submission whose future was dropped before the backend answered,
/// so `in_flight` never leaks.
struct InFlight<'a> {
    session: &'a InferenceSession,
    seq: u64,
    resolved: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            let cancelled = crate::Error::cancelled_with_context(
                crate::ErrorContext::new().with_source("inference_session"),
            );
            let _ = self.session.finish(self.seq, Err(cancelled));
        }
    }
}
