//! Single-flight credential refresh.
//!
//! # States
//! - Idle: no refresh call outstanding
//! - Refreshing: one refresh call outstanding, followers queued behind it
//!
//! # State Transitions
//! ```text
//! Idle → Idle:        401, no refresh token → clear credentials, hard logout
//! Idle → Refreshing:  401 with refresh token → caller becomes the leader
//! Refreshing:         401 from any other request → enqueue, suspend
//! Refreshing → Idle:  refresh ok   → store pair, release leader + queue FIFO with new token
//! Refreshing → Idle:  refresh fail → clear credentials, reject leader + queue FIFO, hard logout
//! Any → Idle:         reset        → drop queued followers, start a new generation
//! ```
//!
//! The `refreshing` flag is set in the same critical section that picks the
//! leader, before the refresh call is issued. Every caller gets back an
//! explicit [`Retry`] carrying its request re-tagged with the new token; the
//! request's `retried` flag is set, so a second 401 is terminal.
//!
//! # Design Decisions
//! - The refresh call runs on its own task; dropping the leader's future
//!   does not cancel it or strand the followers
//! - Each cycle carries a generation number. A refresh only settles the
//!   flag, the queue and the store of its own generation, so a call that
//!   outlives `reset()` cannot release or reject a newer cycle's waiters

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::credentials::CredentialStore;
use crate::errors::{ApiError, RefreshError};
use crate::http::request::RequestDescriptor;
use crate::lifecycle::{LogoutReason, LogoutSignal};
use crate::observability::metrics;
use crate::refresh::protocol::TokenRefresher;

/// Instruction to resubmit a request after a successful refresh.
#[derive(Debug, Clone)]
pub struct Retry {
    /// Original request, `retried` set and `Authorization` carrying the new token.
    pub request: RequestDescriptor,
}

/// New access token, or the reason the refresh failed.
type RefreshResult = Result<String, RefreshError>;

/// A request suspended until the leader's refresh settles.
struct PendingRequest {
    request_id: Uuid,
    tx: oneshot::Sender<RefreshResult>,
}

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    /// Bumped on every election and every reset.
    generation: u64,
    queue: VecDeque<PendingRequest>,
}

impl RefreshState {
    /// Return to idle and hand back the queue in enqueue order.
    fn settle(&mut self) -> VecDeque<PendingRequest> {
        self.refreshing = false;
        metrics::record_refresh_pending(0);
        std::mem::take(&mut self.queue)
    }
}

/// Resets the cycle if the refresh task unwinds before it settles.
struct CycleGuard<'a> {
    state: &'a Mutex<RefreshState>,
    generation: u64,
    armed: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.generation != self.generation {
            return;
        }
        let abandoned = state.settle().len();
        tracing::warn!(abandoned, "Refresh task ended before the refresh settled");
    }
}

struct Shared {
    state: Mutex<RefreshState>,
    store: CredentialStore,
    refresher: Arc<dyn TokenRefresher>,
    logout: LogoutSignal,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().expect("refresh state mutex poisoned")
    }
}

/// Coordinates credential refreshes for one client.
pub struct RefreshCoordinator {
    shared: Arc<Shared>,
}

impl RefreshCoordinator {
    pub fn new(store: CredentialStore, refresher: Arc<dyn TokenRefresher>, logout: LogoutSignal) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(RefreshState::default()),
                store,
                refresher,
                logout,
            }),
        }
    }

    /// Handle an expired-credential failure of `request`.
    ///
    /// Returns the request to resubmit, or the terminal error when the session
    /// could not be recovered.
    pub async fn on_auth_expired(&self, mut request: RequestDescriptor) -> Result<Retry, ApiError> {
        request.retried = true;

        let waiter = {
            let mut state = self.shared.lock();
            if state.refreshing {
                let (tx, rx) = oneshot::channel();
                state.queue.push_back(PendingRequest {
                    request_id: request.id,
                    tx,
                });
                metrics::record_refresh_pending(state.queue.len());
                tracing::debug!(
                    request_id = %request.id,
                    pending = state.queue.len(),
                    "Refresh in flight, queueing request"
                );
                Some(rx)
            } else if let Some(refresh_token) = self.shared.store.refresh_token() {
                state.refreshing = true;
                state.generation += 1;
                let (tx, rx) = oneshot::channel();
                tracing::info!(request_id = %request.id, "Credential expired, refreshing session");
                tokio::spawn(run_refresh(self.shared.clone(), state.generation, refresh_token, tx));
                Some(rx)
            } else {
                None
            }
        };

        let Some(rx) = waiter else {
            tracing::info!(request_id = %request.id, "Credential expired and no refresh token stored");
            self.shared.store.clear();
            self.shared.logout.trigger(LogoutReason::MissingRefreshToken);
            return Err(ApiError::LoggedOut);
        };

        match rx.await {
            Ok(Ok(access_token)) => {
                request.authorize(&access_token);
                Ok(Retry { request })
            }
            Ok(Err(e)) => Err(ApiError::RefreshFailed(e)),
            Err(_) => Err(ApiError::Abandoned),
        }
    }

    /// True while a refresh call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.shared.lock().refreshing
    }

    /// Number of requests queued behind the in-flight refresh.
    pub fn pending(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Drop every queued follower (they observe [`ApiError::Abandoned`]) and
    /// return to idle. A refresh still in flight answers its own leader but
    /// no longer touches the coordinator's state.
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        state.generation += 1;
        let dropped = state.settle().len();
        tracing::debug!(dropped, "Refresh coordinator reset");
    }

    pub fn store(&self) -> &CredentialStore {
        &self.shared.store
    }

    pub fn logout_signal(&self) -> &LogoutSignal {
        &self.shared.logout
    }
}

/// One refresh cycle: call the refresher, settle the state, answer the leader
/// then the queue in FIFO order.
async fn run_refresh(
    shared: Arc<Shared>,
    generation: u64,
    refresh_token: String,
    leader: oneshot::Sender<RefreshResult>,
) {
    let mut guard = CycleGuard {
        state: &shared.state,
        generation,
        armed: true,
    };
    let result = shared.refresher.refresh(&refresh_token).await;
    guard.armed = false;

    let (current, waiters) = {
        let mut state = shared.lock();
        let current = state.generation == generation;
        match &result {
            // A superseded cycle only keeps its pair when nothing newer is in flight.
            Ok(pair) if current || !state.refreshing => shared.store.set(pair),
            Err(_) if current => shared.store.clear(),
            _ => {}
        }
        let waiters = if current { state.settle() } else { VecDeque::new() };
        (current, waiters)
    };

    let outcome: RefreshResult = result.map(|pair| pair.access_token);
    match &outcome {
        Ok(_) => {
            metrics::record_refresh("success");
            tracing::info!(released = waiters.len(), superseded = !current, "Session refreshed");
        }
        Err(e) => {
            metrics::record_refresh("failure");
            tracing::warn!(error = %e, rejected = waiters.len(), superseded = !current, "Session refresh failed");
        }
    }

    if leader.send(outcome.clone()).is_err() {
        tracing::debug!("Refresh leader went away before release");
    }
    for waiter in waiters {
        if waiter.tx.send(outcome.clone()).is_err() {
            tracing::debug!(request_id = %waiter.request_id, "Queued request went away before release");
        }
    }

    if outcome.is_err() && current {
        shared.logout.trigger(LogoutReason::RefreshFailed);
    }
}
