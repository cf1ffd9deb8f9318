//! Domain-typed cache wrapper for the card service (C3), built over
//! `shared::cache::TypedCache`. Entity listings/lookups use the
//! configurable `entity_seconds` TTL; statistics/dashboard use
//! `stats_seconds`/`dashboard_seconds` (spec §3.2: bounded, implementation
//! chooses the value).

use std::time::Duration;

use shared::cache::{InMemoryStore, TypedCache};
use shared::redis_client::RedisClient;
use uuid::Uuid;

use crate::domain::dto::{AmountByPeriodResponse, CardResponse, FindAllResponse};

#[derive(Clone)]
pub struct CardCache {
    list: TypedCache,
    by_id: TypedCache,
    by_user: TypedCache,
    by_card_number: TypedCache,
    stats: TypedCache,
    entity_ttl: Duration,
    stats_ttl: Duration,
}

impl CardCache {
    pub fn new(client: RedisClient, entity_ttl_seconds: u64, stats_ttl_seconds: u64) -> Self {
        Self {
            list: TypedCache::new(client.clone(), "card:find_all"),
            by_id: TypedCache::new(client.clone(), "card:find_by_id"),
            by_user: TypedCache::new(client.clone(), "card:find_by_user_id"),
            by_card_number: TypedCache::new(client.clone(), "card:find_by_card_number"),
            stats: TypedCache::new(client, "card:stats"),
            entity_ttl: Duration::from_secs(entity_ttl_seconds),
            stats_ttl: Duration::from_secs(stats_ttl_seconds),
        }
    }

    /// Test-only constructor over an in-memory [`KvStore`](shared::cache::KvStore)
    /// so service tests can seed/inspect cache state without a live Redis.
    pub fn with_store(store: InMemoryStore, entity_ttl_seconds: u64, stats_ttl_seconds: u64) -> Self {
        Self {
            list: TypedCache::new(store.clone(), "card:find_all"),
            by_id: TypedCache::new(store.clone(), "card:find_by_id"),
            by_user: TypedCache::new(store.clone(), "card:find_by_user_id"),
            by_card_number: TypedCache::new(store.clone(), "card:find_by_card_number"),
            stats: TypedCache::new(store, "card:stats"),
            entity_ttl: Duration::from_secs(entity_ttl_seconds),
            stats_ttl: Duration::from_secs(stats_ttl_seconds),
        }
    }

    pub async fn get_list(&self, fingerprint: &str) -> Option<FindAllResponse> {
        self.list.get(fingerprint).await
    }

    pub async fn set_list(&self, fingerprint: &str, value: &FindAllResponse) {
        self.list.set(fingerprint, value, self.entity_ttl).await;
    }

    pub async fn delete_list(&self, fingerprint: &str) {
        self.list.delete(fingerprint).await;
    }

    pub async fn get_by_id(&self, id: Uuid) -> Option<CardResponse> {
        self.by_id.get(&id.to_string()).await
    }

    pub async fn set_by_id(&self, id: Uuid, value: &CardResponse) {
        self.by_id.set(&id.to_string(), value, self.entity_ttl).await;
    }

    pub async fn delete_by_id(&self, id: Uuid) {
        self.by_id.delete(&id.to_string()).await;
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Option<Vec<CardResponse>> {
        self.by_user.get(&user_id.to_string()).await
    }

    pub async fn set_by_user(&self, user_id: Uuid, value: &Vec<CardResponse>) {
        self.by_user.set(&user_id.to_string(), value, self.entity_ttl).await;
    }

    pub async fn delete_by_user(&self, user_id: Uuid) {
        self.by_user.delete(&user_id.to_string()).await;
    }

    pub async fn get_by_card_number(&self, card_number: &str) -> Option<CardResponse> {
        self.by_card_number.get(card_number).await
    }

    pub async fn set_by_card_number(&self, card_number: &str, value: &CardResponse) {
        self.by_card_number.set(card_number, value, self.entity_ttl).await;
    }

    pub async fn delete_by_card_number(&self, card_number: &str) {
        self.by_card_number.delete(card_number).await;
    }

    pub async fn get_stats(&self, fingerprint: &str) -> Option<Vec<AmountByPeriodResponse>> {
        self.stats.get(fingerprint).await
    }

    pub async fn set_stats(&self, fingerprint: &str, value: &Vec<AmountByPeriodResponse>) {
        self.stats.set(fingerprint, value, self.stats_ttl).await;
    }
}
