//! Domain-typed cache wrapper for the topup service (C3), built over
//! `shared::cache::TypedCache`. Entity listings/lookups use the
//! configurable `entity_seconds` TTL; statistics use `stats_seconds`
//! (spec §3.2: bounded, implementation chooses the value).

use std::time::Duration;

use shared::cache::TypedCache;
use shared::redis_client::RedisClient;
use uuid::Uuid;

use crate::domain::dto::{AmountByMethodResponse, AmountByPeriodResponse, FindAllResponse, TopupResponse};

#[derive(Clone)]
pub struct TopupCache {
    list: TypedCache,
    by_id: TypedCache,
    by_card_number: TypedCache,
    stats: TypedCache,
    entity_ttl: Duration,
    stats_ttl: Duration,
}

impl TopupCache {
    pub fn new(client: RedisClient, entity_ttl_seconds: u64, stats_ttl_seconds: u64) -> Self {
        Self {
            list: TypedCache::new(client.clone(), "topup:find_all"),
            by_id: TypedCache::new(client.clone(), "topup:find_by_id"),
            by_card_number: TypedCache::new(client.clone(), "topup:find_by_card_number"),
            stats: TypedCache::new(client, "topup:stats"),
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

    pub async fn get_by_id(&self, id: Uuid) -> Option<TopupResponse> {
        self.by_id.get(&id.to_string()).await
    }

    pub async fn set_by_id(&self, id: Uuid, value: &TopupResponse) {
        self.by_id.set(&id.to_string(), value, self.entity_ttl).await;
    }

    pub async fn delete_by_id(&self, id: Uuid) {
        self.by_id.delete(&id.to_string()).await;
    }

    pub async fn get_by_card_number(&self, card_number: &str) -> Option<Vec<TopupResponse>> {
        self.by_card_number.get(card_number).await
    }

    pub async fn set_by_card_number(&self, card_number: &str, value: &Vec<TopupResponse>) {
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

    pub async fn get_method_stats(&self, fingerprint: &str) -> Option<Vec<AmountByMethodResponse>> {
        self.stats.get(fingerprint).await
    }

    pub async fn set_method_stats(&self, fingerprint: &str, value: &Vec<AmountByMethodResponse>) {
        self.stats.set(fingerprint, value, self.stats_ttl).await;
    }
}
