//! Hard-logout signalling.

use tokio::sync::broadcast;

use crate::observability::metrics;

/// Why the session was ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// A 401 arrived and there was no refresh token to recover with.
    MissingRefreshToken,
    /// The refresh-protocol call failed.
    RefreshFailed,
}

impl LogoutReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoutReason::MissingRefreshToken => "missing_refresh_token",
            LogoutReason::RefreshFailed => "refresh_failed",
        }
    }
}

/// Emitted once per ended session; consumers navigate to `redirect_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutEvent {
    pub reason: LogoutReason,
    pub redirect_to: String,
}

/// Broadcasts hard-logout events to every subscriber.
///
/// Triggering with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct LogoutSignal {
    tx: broadcast::Sender<LogoutEvent>,
    redirect_to: String,
}

impl LogoutSignal {
    pub fn new(redirect_to: impl Into<String>) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            tx,
            redirect_to: redirect_to.into(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogoutEvent> {
        self.tx.subscribe()
    }

    pub fn trigger(&self, reason: LogoutReason) {
        tracing::warn!(reason = reason.as_str(), redirect_to = %self.redirect_to, "Hard logout");
        metrics::record_logout(reason.as_str());
        let _ = self.tx.send(LogoutEvent {
            reason,
            redirect_to: self.redirect_to.clone(),
        });
    }

    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LogoutSignal {
    fn default() -> Self {
        Self::new("/login")
    }
}
