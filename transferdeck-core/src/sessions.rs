use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::*;
use transferdeck_common::{ConsoleUser, Secret};

struct SessionEntry {
    user: ConsoleUser,
    last_used: Instant,
}

impl SessionEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_used.elapsed() > ttl
    }
}

/// In-memory store of bearer tokens for logged-in console users.
///
/// Tokens are opaque 32-byte random hex strings handed out at login and sent
/// back in the `X-Transferdeck-Token` header. Resolving a token refreshes its
/// idle timer; expired entries are dropped lazily on resolve and swept by a
/// periodic vacuum.
pub struct SessionStore {
    ttl: Duration,
    store: HashMap<String, SessionEntry>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            store: HashMap::new(),
        }
    }

    pub fn issue(&mut self, user: ConsoleUser) -> Secret<String> {
        let token = Secret::random();
        info!(username=%user.username, "Session started");
        self.store.insert(
            token.expose_secret().clone(),
            SessionEntry {
                user,
                last_used: Instant::now(),
            },
        );
        token
    }

    pub fn resolve(&mut self, token: &str) -> Option<ConsoleUser> {
        match self.store.get_mut(token) {
            Some(entry) if entry.is_expired(self.ttl) => {
                self.store.remove(token);
                None
            }
            Some(entry) => {
                entry.last_used = Instant::now();
                Some(entry.user.clone())
            }
            None => None,
        }
    }

    pub fn revoke(&mut self, token: &str) {
        if let Some(entry) = self.store.remove(token) {
            info!(username=%entry.user.username, "Session ended");
        }
    }

    pub fn vacuum(&mut self) {
        let ttl = self.ttl;
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired(ttl));
        let swept = before - self.store.len();
        if swept > 0 {
            debug!(%swept, "Swept expired sessions");
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use transferdeck_common::Role;

    use super::*;

    fn user() -> ConsoleUser {
        ConsoleUser::new("alice", Role::User)
    }

    #[test]
    fn issued_tokens_resolve_to_their_user() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        let token = store.issue(user());
        let resolved = store.resolve(token.expose_secret()).unwrap();
        assert_eq!(resolved.username, "alice");
    }

    #[test]
    fn unknown_and_revoked_tokens_do_not_resolve() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        assert!(store.resolve("deadbeef").is_none());

        let token = store.issue(user());
        store.revoke(token.expose_secret());
        assert!(store.resolve(token.expose_secret()).is_none());
    }

    #[test]
    fn expired_tokens_are_dropped_on_resolve() {
        let mut store = SessionStore::new(Duration::ZERO);
        let token = store.issue(user());
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.resolve(token.expose_secret()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn vacuum_sweeps_only_expired_entries() {
        let mut store = SessionStore::new(Duration::from_millis(20));
        let stale = store.issue(user());
        std::thread::sleep(Duration::from_millis(30));
        let fresh = store.issue(user());
        store.vacuum();
        assert_eq!(store.len(), 1);
        assert!(store.resolve(stale.expose_secret()).is_none());
        assert!(store.resolve(fresh.expose_secret()).is_some());
    }
}
