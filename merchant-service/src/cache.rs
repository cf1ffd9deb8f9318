//! Domain-typed cache wrapper for the merchant service (C3), built over
//! `shared::cache::TypedCache`. Entity listings/lookups use the
//! configurable `entity_seconds` TTL; statistics use `stats_seconds`
//! (spec §3.2: bounded, implementation chooses the value).

use std::time::Duration;

use shared::cache::TypedCache;
use shared::redis_client::RedisClient;
use uuid::Uuid;

use crate::domain::dto::{AmountByPeriodResponse, FindAllResponse, MerchantResponse, PaymentMethodAmountResponse};

#[derive(Clone)]
pub struct MerchantCache {
    list: TypedCache,
    by_id: TypedCache,
    by_user: TypedCache,
    by_api_key: TypedCache,
    amount_stats: TypedCache,
    payment_method_stats: TypedCache,
    total_stats: TypedCache,
    entity_ttl: Duration,
    stats_ttl: Duration,
}

impl MerchantCache {
    pub fn new(client: RedisClient, entity_ttl_seconds: u64, stats_ttl_seconds: u64) -> Self {
        Self {
            list: TypedCache::new(client.clone(), "merchant:find_all"),
            by_id: TypedCache::new(client.clone(), "merchant:find_by_id"),
            by_user: TypedCache::new(client.clone(), "merchant:find_by_user_id"),
            by_api_key: TypedCache::new(client.clone(), "merchant:find_by_api_key"),
            amount_stats: TypedCache::new(client.clone(), "merchant:stats:amount"),
            payment_method_stats: TypedCache::new(client.clone(), "merchant:stats:payment_method"),
            total_stats: TypedCache::new(client, "merchant:stats:total"),
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

    pub async fn get_by_id(&self, id: Uuid) -> Option<MerchantResponse> {
        self.by_id.get(&id.to_string()).await
    }

    pub async fn set_by_id(&self, id: Uuid, value: &MerchantResponse) {
        self.by_id.set(&id.to_string(), value, self.entity_ttl).await;
    }

    pub async fn delete_by_id(&self, id: Uuid) {
        self.by_id.delete(&id.to_string()).await;
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Option<Vec<MerchantResponse>> {
        self.by_user.get(&user_id.to_string()).await
    }

    pub async fn set_by_user(&self, user_id: Uuid, value: &Vec<MerchantResponse>) {
        self.by_user.set(&user_id.to_string(), value, self.entity_ttl).await;
    }

    pub async fn delete_by_user(&self, user_id: Uuid) {
        self.by_user.delete(&user_id.to_string()).await;
    }

    pub async fn get_by_api_key(&self, api_key: &str) -> Option<MerchantResponse> {
        self.by_api_key.get(api_key).await
    }

    pub async fn set_by_api_key(&self, api_key: &str, value: &MerchantResponse) {
        self.by_api_key.set(api_key, value, self.entity_ttl).await;
    }

    pub async fn delete_by_api_key(&self, api_key: &str) {
        self.by_api_key.delete(api_key).await;
    }

    pub async fn get_amount_stats(&self, fingerprint: &str) -> Option<Vec<AmountByPeriodResponse>> {
        self.amount_stats.get(fingerprint).await
    }

    pub async fn set_amount_stats(&self, fingerprint: &str, value: &Vec<AmountByPeriodResponse>) {
        self.amount_stats.set(fingerprint, value, self.stats_ttl).await;
    }

    pub async fn get_payment_method_stats(&self, fingerprint: &str) -> Option<Vec<PaymentMethodAmountResponse>> {
        self.payment_method_stats.get(fingerprint).await
    }

    pub async fn set_payment_method_stats(&self, fingerprint: &str, value: &Vec<PaymentMethodAmountResponse>) {
        self.payment_method_stats.set(fingerprint, value, self.stats_ttl).await;
    }

    pub async fn get_total_stats(&self, fingerprint: &str) -> Option<i64> {
        self.total_stats.get(fingerprint).await
    }

    pub async fn set_total_stats(&self, fingerprint: &str, value: i64) {
        self.total_stats.set(fingerprint, &value, self.stats_ttl).await;
    }
}
