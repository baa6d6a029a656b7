use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::middleware::SessionId;
use crate::models::{NavigationState, Theme};

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

/// Most sessions kept at once; the least recently used goes first
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Everything one browser session remembers between requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub navigation: NavigationState,
    pub theme: Theme,
}

struct SessionEntry {
    context: SessionContext,
    last_seen: Instant,
    // Monotonic use counter for least-recently-used eviction
    last_use: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<SessionId, SessionEntry>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, id: SessionId) -> Option<&mut SessionEntry> {
        let tick = self.tick();
        let entry = self.entries.get_mut(&id)?;
        entry.last_seen = Instant::now();
        entry.last_use = tick;
        Some(entry)
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_use)
            .map(|(id, _)| *id);

        if let Some(id) = oldest {
            self.entries.remove(&id);
            tracing::debug!(session_id = %id, "Session evicted, store at capacity");
        }
    }
}

/// Per-session contexts, keyed by the session cookie
///
/// Only sessions whose context differs from the default are stored. Entries
/// idle longer than `idle_ttl` are removed by `evict_idle`, and the store never
/// holds more than `max_sessions`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Sessions>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_IDLE, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Sessions::default())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Snapshot of a session; unknown sessions start fresh and are not stored
    pub async fn get(&self, id: SessionId) -> SessionContext {
        let mut inner = self.inner.write().await;
        inner
            .touch(id)
            .map(|entry| entry.context.clone())
            .unwrap_or_default()
    }

    /// Applies `f` to the session as one atomic transition
    ///
    /// An unknown session is only stored when `f` leaves it different from
    /// the default context.
    pub async fn update<F, R>(&self, id: SessionId, f: F) -> R
    where
        F: FnOnce(&mut SessionContext) -> R,
    {
        let mut inner = self.inner.write().await;

        if let Some(entry) = inner.touch(id) {
            return f(&mut entry.context);
        }

        let mut context = SessionContext::default();
        let result = f(&mut context);

        if context != SessionContext::default() {
            while inner.entries.len() >= self.max_sessions {
                inner.evict_least_recent();
            }
            let last_use = inner.tick();
            inner.entries.insert(
                id,
                SessionEntry {
                    context,
                    last_seen: Instant::now(),
                    last_use,
                },
            );
        }

        result
    }

    /// Drops sessions idle for at least `idle_ttl`, returning how many were removed
    pub async fn evict_idle(&self) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        let idle_ttl = self.idle_ttl;
        inner
            .entries
            .retain(|_, entry| entry.last_seen.elapsed() < idle_ttl);
        before - inner.entries.len()
    }

    /// Runs `evict_idle` every `period`, forever
    pub async fn run_sweeper(&self, period: Duration) {
        let mut ticker = tokio::time::interval(period);

        loop {
            ticker.tick().await;
            let removed = self.evict_idle().await;
            if removed > 0 {
                let remaining = self.len().await;
                tracing::info!(removed, remaining, "Idle sessions evicted");
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let alice = SessionId::new();
        let bob = SessionId::new();

        store.update(alice, |ctx| ctx.navigation.select("Inception")).await;

        assert_eq!(store.get(alice).await.navigation.page(), Page::Recommend);
        assert_eq!(store.get(bob).await.navigation.page(), Page::Browse);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_returns_closure_result() {
        let store = SessionStore::new();
        let id = SessionId::new();

        let theme = store
            .update(id, |ctx| {
                ctx.theme = Theme::Dark;
                ctx.theme
            })
            .await;

        assert_eq!(theme, Theme::Dark);
        assert_eq!(store.get(id).await.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_get_does_not_create_session() {
        let store = SessionStore::new();
        let context = store.get(SessionId::new()).await;
        assert_eq!(context, SessionContext::default());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_default_transition_stores_nothing() {
        let store = SessionStore::new();

        for _ in 0..100 {
            store.update(SessionId::new(), |ctx| ctx.navigation.back()).await;
            store
                .update(SessionId::new(), |ctx| ctx.theme = Theme::Light)
                .await;
        }

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recently_used() {
        let store = SessionStore::with_limits(DEFAULT_SESSION_IDLE, 2);
        let first = SessionId::new();
        let second = SessionId::new();
        let third = SessionId::new();

        store.update(first, |ctx| ctx.theme = Theme::Dark).await;
        store.update(second, |ctx| ctx.theme = Theme::Dark).await;
        // Reading `first` makes `second` the least recently used
        store.get(first).await;
        store.update(third, |ctx| ctx.theme = Theme::Dark).await;

        assert_eq!(store.len().await, 2);
        assert_eq!(store.get(first).await.theme, Theme::Dark);
        assert_eq!(store.get(second).await.theme, Theme::Light);
        assert_eq!(store.get(third).await.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_evict_idle() {
        let store = SessionStore::with_limits(Duration::ZERO, DEFAULT_MAX_SESSIONS);
        store
            .update(SessionId::new(), |ctx| ctx.navigation.select("Heat"))
            .await;
        store
            .update(SessionId::new(), |ctx| ctx.theme = Theme::Dark)
            .await;

        assert_eq!(store.evict_idle().await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_active_sessions_survive_sweep() {
        let store = SessionStore::new();
        let id = SessionId::new();
        store.update(id, |ctx| ctx.navigation.select("Heat")).await;

        assert_eq!(store.evict_idle().await, 0);
        assert_eq!(store.get(id).await.navigation.selected_movie(), Some("Heat"));
    }
}
