//! In-memory session state.
//!
//! The session token's expiry is server-controlled; the client never
//! inspects the token and only learns of expiry through a 401 response.

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

/// A session token together with the time it was acquired.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub token: String,
    pub acquired_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String) -> Self {
        Self {
            token,
            acquired_at: Utc::now(),
        }
    }

    /// Seconds since this token was acquired (for diagnostics).
    pub fn age_secs(&self) -> i64 {
        (Utc::now() - self.acquired_at).num_seconds()
    }
}

/// Holder of the current session token.
///
/// At most one token is current at any time. The slot is guarded by an async
/// lock held across authentication, so concurrent callers wait for a single
/// refresh instead of each triggering their own.
#[derive(Debug, Default)]
pub struct Session {
    slot: Mutex<Option<SessionData>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current token, if any. No side effects.
    pub async fn token(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|d| d.token.clone())
    }

    /// Clear the current token, forcing the next call to re-authenticate.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// Whether a token is currently held.
    pub async fn is_active(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Lock the token slot. The gateway holds this guard across the
    /// authentication request so only one authentication runs at a time.
    pub(crate) async fn guard(&self) -> MutexGuard<'_, Option<SessionData>> {
        self.slot.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty_and_tracks_the_latest_token() {
        let session = Session::new();
        assert!(session.token().await.is_none());
        assert!(!session.is_active().await);

        *session.guard().await = Some(SessionData::new("tok-1".to_string()));
        assert_eq!(session.token().await.as_deref(), Some("tok-1"));
        assert!(session.is_active().await);

        *session.guard().await = Some(SessionData::new("tok-2".to_string()));
        assert_eq!(session.token().await.as_deref(), Some("tok-2"));

        session.invalidate().await;
        assert!(session.token().await.is_none());
        assert!(!session.is_active().await);
    }

    #[test]
    fn a_fresh_token_has_no_age() {
        let data = SessionData::new("tok".to_string());
        assert!(data.age_secs() <= 1);
    }
}
