use super::Session;
use crate::{Error, Result};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// In-memory sessions keyed by cookie id. Nothing is persisted.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    /// `max_sessions` bounds memory: creating one past the cap evicts the
    /// least recently used session.
    pub fn new(ttl_secs: u64, max_sessions: usize) -> Self {
        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Returns the id of a live session, creating one when `id` is unknown or
    /// expired. The boolean is true when a new session was created.
    pub async fn resolve(&self, id: Option<Uuid>) -> (Uuid, bool) {
        let mut sessions = self.sessions.lock().await;
        self.prune(&mut sessions);

        if let Some(id) = id
            && sessions.contains_key(&id)
        {
            return (id, false);
        }

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.updated_at)
                .map(|s| s.id)
            else {
                break;
            };
            sessions.remove(&oldest);
            warn!("Session limit {} reached, evicted {}", self.max_sessions, oldest);
        }

        let id = Uuid::new_v4();
        sessions.insert(id, Session::new(id));
        info!("Created session {} ({} active)", id, sessions.len());
        (id, true)
    }

    /// Runs `f` against the session under the store lock. Keep `f` short:
    /// network calls must happen outside.
    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Result<R> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::session(format!("Session not found: {}", id)))?;
        Ok(f(session))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn prune(&self, sessions: &mut HashMap<Uuid, Session>) {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        let removed = before - sessions.len();
        if removed > 0 {
            debug!("Pruned {} expired sessions", removed);
        }
    }
}
