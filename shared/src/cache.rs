//! # Cache fabric (C3)
//!
//! Two-level abstraction per the §9 redesign flag: [`KvStore`] is the
//! generic `{get,set,delete}` layer — the only seam touching an external
//! cache client — and [`TypedCache`] is the domain-typed wrapper each
//! service builds its own named `GetXxx`/`SetXxx`/`DeleteXxx` functions on
//! top of, owning its key template and TTL. [`RedisClient`] is the
//! production [`KvStore`]; [`InMemoryStore`] is a test double so service
//! tests can exercise cache-hit and write-through-invalidate behavior
//! without a live Redis.
//!
//! Negative caching is forbidden: [`TypedCache::get`] only ever returns
//! `Some` on an actual stored value, never on a miss, and nothing is written
//! back for a miss.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::redis_client::RedisClient;

/// Fixed TTLs mandated by spec §3.2. Bounded statistics/dashboard TTLs are
/// configurable (`shared::config::CacheTtlConfig`); these three are not.
pub const VERIFICATION_CODE_TTL: Duration = Duration::from_secs(15 * 60);
pub const RESET_TOKEN_TTL: Duration = Duration::from_secs(5 * 60);
pub const LOGIN_SESSION_TTL: Duration = Duration::from_secs(60);

/// The generic `{get,set,delete}` seam [`TypedCache`] is built on.
/// `RedisClient` is the only production implementation; [`InMemoryStore`]
/// exists so cache-hit/write-invalidate semantics can be unit-tested.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get_json(&self, key: &str) -> Option<Value>;
    async fn set_json(&self, key: &str, value: Value, ttl: Duration);
    async fn delete_json(&self, key: &str);
}

#[async_trait]
impl KvStore for RedisClient {
    async fn get_json(&self, key: &str) -> Option<Value> {
        self.get::<Value>(key).await.ok().flatten()
    }

    async fn set_json(&self, key: &str, value: Value, ttl: Duration) {
        if let Err(err) = self.set(key, &value, Some(ttl)).await {
            tracing::warn!(key, error = %err, "cache set failed");
        }
    }

    async fn delete_json(&self, key: &str) {
        if let Err(err) = self.delete(key).await {
            tracing::warn!(key, error = %err, "cache delete failed");
        }
    }
}

/// In-memory [`KvStore`] double: no network, TTLs are accepted but never
/// expire entries. Cheap to clone — state lives behind an `Arc<Mutex<_>>`,
/// so every clone of one `InMemoryStore` shares the same backing map.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for InMemoryStore {
    async fn get_json(&self, key: &str) -> Option<Value> {
        self.entries.lock().expect("lock poisoned").get(key).cloned()
    }

    async fn set_json(&self, key: &str, value: Value, _ttl: Duration) {
        self.entries.lock().expect("lock poisoned").insert(key.to_string(), value);
    }

    async fn delete_json(&self, key: &str) {
        self.entries.lock().expect("lock poisoned").remove(key);
    }
}

/// A domain-scoped cache over a shared [`KvStore`].
///
/// `prefix` is the fixed key template fragment for one domain (e.g.
/// `"card"`, `"merchant:find_all"`); the fingerprint passed to each call is
/// appended verbatim, so keys differing only in whitespace/case are distinct
/// per spec §4.3.
#[derive(Clone)]
pub struct TypedCache {
    store: Arc<dyn KvStore>,
    prefix: &'static str,
}

impl TypedCache {
    pub fn new<S: KvStore + 'static>(store: S, prefix: &'static str) -> Self {
        Self { store: Arc::new(store), prefix }
    }

    fn key(&self, fingerprint: &str) -> String {
        format!("{}:{}", self.prefix, fingerprint)
    }

    /// Returns `Some(value)` only on an actual cache hit. A miss is `None`
    /// and is never itself cached.
    pub async fn get<T: DeserializeOwned>(&self, fingerprint: &str) -> Option<T> {
        let value = self.store.get_json(&self.key(fingerprint)).await?;
        serde_json::from_value(value).ok()
    }

    /// Stores `value` under `fingerprint` with `ttl`. Errors are logged by
    /// the underlying store and swallowed: a cache-write failure must never
    /// fail the request that produced the value.
    pub async fn set<T: Serialize + Sync>(&self, fingerprint: &str, value: &T, ttl: Duration) {
        match serde_json::to_value(value) {
            Ok(v) => self.store.set_json(&self.key(fingerprint), v, ttl).await,
            Err(err) => tracing::warn!(prefix = self.prefix, fingerprint, error = %err, "cache serialize failed"),
        }
    }

    /// Invalidates one fingerprinted key.
    pub async fn delete(&self, fingerprint: &str) {
        self.store.delete_json(&self.key(fingerprint)).await;
    }

    /// Invalidates a bounded set of related keys in one call, e.g. every
    /// paginated listing page affected by a shape-changing mutation.
    pub async fn delete_many(&self, fingerprints: &[String]) {
        for fp in fingerprints {
            self.delete(fp).await;
        }
    }
}

/// Deterministic fingerprint for a paginated `FindAll`-style request, per
/// spec §4.3: `(page, page_size, search, scope)`. `scope` distinguishes
/// sibling listings over the same entity (e.g. `"active"` vs `"trashed"`,
/// or a card number for a by-card-number listing).
pub fn list_fingerprint(page: i64, page_size: i64, search: &str, scope: &str) -> String {
    format!("{scope}:page={page}:size={page_size}:search={search}")
}

/// Fingerprint for a per-year statistics lookup.
pub fn year_fingerprint(year: i32) -> String {
    format!("year={year}")
}

/// Fingerprint for a per-card, per-year statistics lookup.
pub fn card_year_fingerprint(card_number: &str, year: i32) -> String {
    format!("card={card_number}:year={year}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_fingerprint_distinguishes_whitespace_and_case() {
        assert_ne!(
            list_fingerprint(1, 10, "Acme", "active"),
            list_fingerprint(1, 10, "acme", "active")
        );
        assert_ne!(
            list_fingerprint(1, 10, "acme ", "active"),
            list_fingerprint(1, 10, "acme", "active")
        );
    }

    #[test]
    fn card_year_fingerprint_is_stable() {
        assert_eq!(card_year_fingerprint("4111", 2025), card_year_fingerprint("4111", 2025));
        assert_ne!(card_year_fingerprint("4111", 2025), card_year_fingerprint("4111", 2026));
    }

    #[tokio::test]
    async fn miss_is_none_and_never_cached() {
        let cache = TypedCache::new(InMemoryStore::new(), "card:find_by_id");
        assert_eq!(cache.get::<String>("missing").await, None);
        // still a miss: Get never writes back on its own.
        assert_eq!(cache.get::<String>("missing").await, None);
    }

    #[tokio::test]
    async fn set_then_get_is_a_hit() {
        let cache = TypedCache::new(InMemoryStore::new(), "card:find_by_id");
        cache.set("abc", &"value".to_string(), Duration::from_secs(60)).await;
        assert_eq!(cache.get::<String>("abc").await, Some("value".to_string()));
    }

    #[tokio::test]
    async fn delete_invalidates_immediately() {
        let cache = TypedCache::new(InMemoryStore::new(), "card:find_by_id");
        cache.set("abc", &"value".to_string(), Duration::from_secs(60)).await;
        cache.delete("abc").await;
        assert_eq!(cache.get::<String>("abc").await, None);
    }

    #[tokio::test]
    async fn clones_share_the_same_backing_store() {
        let store = InMemoryStore::new();
        let writer = TypedCache::new(store.clone(), "card:find_by_id");
        let reader = TypedCache::new(store, "card:find_by_id");
        writer.set("abc", &"value".to_string(), Duration::from_secs(60)).await;
        assert_eq!(reader.get::<String>("abc").await, Some("value".to_string()));
    }
}
