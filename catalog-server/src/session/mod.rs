//! Session store and visit ledger
//!
//! Per-browser-session state, keyed by an opaque cookie id. The only
//! thing a session carries is the visit ledger: a mapping from product
//! id to how many times this session has viewed it, which feeds the
//! dynamic pricing engine. Sessions live in process memory with a
//! sliding TTL and are pruned by a background task; the ledger is
//! naturally bounded by the products one session actually views.
//!
//! Concurrent requests within one session can race on an increment;
//! the worst case is an off-by-one displayed price, so no per-session
//! serialization is attempted.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "catalog_sid";

#[derive(Debug)]
struct Session {
    /// product id -> views in this session
    visits: HashMap<String, u32>,
    expires_at: DateTime<Utc>,
}

/// In-memory session store
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Generate a fresh opaque session id
    pub fn new_session_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Record one product view and return the session's new view count
    /// for that product. Creates the session lazily and refreshes its
    /// sliding expiry.
    pub fn record_visit(&self, session_id: &str, product_id: &str) -> u32 {
        let mut entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                visits: HashMap::new(),
                expires_at: Utc::now() + self.ttl,
            });
        entry.expires_at = Utc::now() + self.ttl;
        let count = entry.visits.entry(product_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Current view count without recording a visit
    pub fn visit_count(&self, session_id: &str, product_id: &str) -> u32 {
        self.sessions
            .get(session_id)
            .and_then(|s| s.visits.get(product_id).copied())
            .unwrap_or(0)
    }

    /// Drop sessions past their expiry; returns how many were removed
    pub fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        before - self.sessions.len()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Pull the session id out of a `Cookie` request header value
pub fn session_id_from_cookies(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// `Set-Cookie` header value establishing a session
pub fn session_cookie_value(session_id: &str, ttl_minutes: i64) -> String {
    format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl_minutes * 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_start_at_one_and_increment() {
        let store = SessionStore::new(60);
        assert_eq!(store.visit_count("s1", "p1"), 0);
        assert_eq!(store.record_visit("s1", "p1"), 1);
        assert_eq!(store.record_visit("s1", "p1"), 2);
        assert_eq!(store.record_visit("s1", "p1"), 3);
        assert_eq!(store.visit_count("s1", "p1"), 3);
    }

    #[test]
    fn ledgers_are_isolated_per_session_and_product() {
        let store = SessionStore::new(60);
        store.record_visit("s1", "p1");
        store.record_visit("s1", "p1");
        store.record_visit("s1", "p2");
        store.record_visit("s2", "p1");

        assert_eq!(store.visit_count("s1", "p1"), 2);
        assert_eq!(store.visit_count("s1", "p2"), 1);
        assert_eq!(store.visit_count("s2", "p1"), 1);
        assert_eq!(store.visit_count("s2", "p2"), 0);
    }

    #[test]
    fn concurrent_sessions_do_not_interfere() {
        use std::sync::Arc;

        let store = Arc::new(SessionStore::new(60));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let sid = format!("session-{i}");
                    for _ in 0..50 {
                        store.record_visit(&sid, "p1");
                    }
                    store.visit_count(&sid, "p1")
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 50);
        }
        assert_eq!(store.len(), 8);
    }

    #[test]
    fn expired_sessions_are_pruned() {
        let store = SessionStore::new(-1); // everything is already expired
        store.record_visit("s1", "p1");
        store.record_visit("s2", "p1");
        assert_eq!(store.len(), 2);
        assert_eq!(store.prune_expired(), 2);
        assert!(store.is_empty());
        // ledger is gone with the session
        assert_eq!(store.visit_count("s1", "p1"), 0);
    }

    #[test]
    fn session_ids_are_unique() {
        let a = SessionStore::new_session_id();
        let b = SessionStore::new_session_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn cookie_parsing_finds_the_session_id() {
        let header = "theme=dark; catalog_sid=abc123; lang=en";
        assert_eq!(session_id_from_cookies(header).as_deref(), Some("abc123"));
        assert_eq!(session_id_from_cookies("theme=dark"), None);
        assert_eq!(session_id_from_cookies("catalog_sid="), None);
    }

    #[test]
    fn set_cookie_value_shape() {
        let value = session_cookie_value("abc", 60);
        assert!(value.starts_with("catalog_sid=abc;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=3600"));
    }
}
