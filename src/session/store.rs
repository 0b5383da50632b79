use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

use crate::config::SessionConfig;
use crate::foundation::error::{CoifError, CoifResult};
use crate::placement::adjustment::Adjustment;

const MAX_SESSION_ID_LEN: usize = 256;

/// Per-session try-on settings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionState {
    /// Caller-chosen session identifier.
    pub session_id: String,
    /// Selected hairstyle reference, if any.
    pub asset: Option<String>,
    /// Manual placement tweaks.
    pub adjustment: Adjustment,
}

impl SessionState {
    fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            asset: None,
            adjustment: Adjustment::IDENTITY,
        }
    }
}

#[derive(Debug)]
struct Entry {
    state: SessionState,
    /// Nanoseconds since the store epoch at last use.
    seen_at: AtomicU64,
    /// Monotonic use counter, for LRU ordering.
    used: AtomicU64,
}

/// Bounded map from session id to [`SessionState`].
///
/// Frame threads take the read lock to copy a snapshot; writers (adjustments, resets, first use of
/// an id, sweeps) take the write lock. Usage stamps are atomics so touching a session never needs
/// the write lock.
#[derive(Debug)]
pub struct SessionStore {
    cfg: SessionConfig,
    epoch: Instant,
    clock: AtomicU64,
    sessions: RwLock<HashMap<String, Entry>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionStore {
    /// Empty store with the given bounds.
    pub fn new(cfg: SessionConfig) -> Self {
        Self {
            cfg,
            epoch: Instant::now(),
            clock: AtomicU64::new(0),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Bounds in use.
    pub fn config(&self) -> &SessionConfig {
        &self.cfg
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the session's state, creating the session on first use.
    pub fn snapshot(&self, session_id: &str) -> CoifResult<SessionState> {
        validate_session_id(session_id)?;
        if let Some(entry) = self.read().get(session_id) {
            self.touch(entry);
            return Ok(entry.state.clone());
        }
        self.update(session_id, |_| {})
    }

    /// Copy of the session's state without creating or touching it.
    pub fn get(&self, session_id: &str) -> Option<SessionState> {
        self.read().get(session_id).map(|e| e.state.clone())
    }

    /// Replace the session's adjustment.
    pub fn set_adjustment(
        &self,
        session_id: &str,
        adjustment: Adjustment,
    ) -> CoifResult<SessionState> {
        validate_session_id(session_id)?;
        self.update(session_id, |s| s.adjustment = adjustment)
    }

    /// Select (or clear) the session's hairstyle.
    pub fn select_asset(
        &self,
        session_id: &str,
        asset: Option<String>,
    ) -> CoifResult<SessionState> {
        validate_session_id(session_id)?;
        self.update(session_id, |s| s.asset = asset)
    }

    /// Forget a session. Returns whether it existed.
    pub fn reset(&self, session_id: &str) -> bool {
        let removed = self.write().remove(session_id).is_some();
        if removed {
            tracing::info!(session_id, "session reset");
        }
        removed
    }

    /// Remove sessions idle longer than the configured TTL.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// Remove sessions idle longer than the configured TTL as of `now`.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let ttl = self.cfg.idle_ttl().as_nanos();
        let now = self.nanos(now);
        let mut map = self.write();
        let before = map.len();
        map.retain(|_, e| {
            u128::from(now.saturating_sub(e.seen_at.load(Ordering::Relaxed))) <= ttl
        });
        let removed = before - map.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = map.len(), "expired idle sessions");
        }
        removed
    }

    fn update(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut SessionState),
    ) -> CoifResult<SessionState> {
        let mut map = self.write();
        if !map.contains_key(session_id) {
            self.evict_for_insert(&mut map);
            map.insert(
                session_id.to_string(),
                Entry {
                    state: SessionState::new(session_id),
                    seen_at: AtomicU64::new(0),
                    used: AtomicU64::new(0),
                },
            );
        }
        let entry = map
            .get_mut(session_id)
            .ok_or_else(|| CoifError::validation("session vanished during update"))?;
        f(&mut entry.state);
        self.touch(entry);
        Ok(entry.state.clone())
    }

    fn evict_for_insert(&self, map: &mut HashMap<String, Entry>) {
        while !map.is_empty() && map.len() >= self.cfg.max_sessions {
            let oldest = map
                .iter()
                .min_by_key(|(_, e)| e.used.load(Ordering::Relaxed))
                .map(|(k, _)| k.clone());
            let Some(oldest) = oldest else {
                break;
            };
            map.remove(&oldest);
            tracing::debug!(session_id = oldest.as_str(), "evicted least recently used session");
        }
    }

    fn touch(&self, entry: &Entry) {
        entry
            .seen_at
            .store(self.nanos(Instant::now()), Ordering::Relaxed);
        entry
            .used
            .store(self.clock.fetch_add(1, Ordering::Relaxed) + 1, Ordering::Relaxed);
    }

    fn nanos(&self, at: Instant) -> u64 {
        u64::try_from(at.saturating_duration_since(self.epoch).as_nanos()).unwrap_or(u64::MAX)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn validate_session_id(session_id: &str) -> CoifResult<()> {
    if session_id.trim().is_empty() {
        return Err(CoifError::validation("session id must be non-empty"));
    }
    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(CoifError::validation(format!(
            "session id longer than {MAX_SESSION_ID_LEN} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/session/store.rs"]
mod tests;
