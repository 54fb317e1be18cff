use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};

use super::SessionState;

const ENABLE_LOGS: bool = true;

/// Keeps each session's state apart, keyed by session id.
///
/// Callers never get a reference that outlives the lock; all access goes
/// through [`SessionRegistry::with_session`].
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) -> Result<String> {
        let state = SessionState::new();
        let id = state.id.clone();
        self.lock()?.insert(id.clone(), state);
        crate::log_info!("Opened session {}", id);
        Ok(id)
    }

    /// Drops the session and everything it recorded.
    pub fn close(&self, session_id: &str) -> Result<()> {
        self.lock()?
            .remove(session_id)
            .map(|state| {
                crate::log_info!(
                    "Closed session {} after {} analyses",
                    session_id,
                    state.len()
                );
            })
            .ok_or_else(|| anyhow!("unknown session {session_id}"))
    }

    pub fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionState) -> T,
    ) -> Result<T> {
        let mut guard = self.lock()?;
        let state = guard
            .get_mut(session_id)
            .ok_or_else(|| anyhow!("unknown session {session_id}"))?;
        Ok(f(state))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionState>>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow!("session registry lock poisoned"))
    }
}
