//! Domain-typed cache wrapper for the dashboard aggregator (C3), built
//! over `shared::cache::TypedCache`. Uses the configurable
//! `dashboard_seconds` TTL (spec §3.2: "statistics/dashboard caches have a
//! fixed domain TTL ... bounded").

use std::time::Duration;

use shared::cache::TypedCache;
use shared::redis_client::RedisClient;

use crate::domain::dto::{DashboardByCardResponse, DashboardResponse};

#[derive(Clone)]
pub struct DashboardCache {
    overall: TypedCache,
    by_card_number: TypedCache,
    ttl: Duration,
}

impl DashboardCache {
    pub fn new(client: RedisClient, dashboard_ttl_seconds: u64) -> Self {
        Self {
            overall: TypedCache::new(client.clone(), "dashboard:overall"),
            by_card_number: TypedCache::new(client, "dashboard:by_card_number"),
            ttl: Duration::from_secs(dashboard_ttl_seconds),
        }
    }

    pub async fn get(&self) -> Option<DashboardResponse> {
        self.overall.get("all").await
    }

    pub async fn set(&self, value: &DashboardResponse) {
        self.overall.set("all", value, self.ttl).await;
    }

    pub async fn get_by_card_number(&self, card_number: &str) -> Option<DashboardByCardResponse> {
        self.by_card_number.get(card_number).await
    }

    pub async fn set_by_card_number(&self, card_number: &str, value: &DashboardByCardResponse) {
        self.by_card_number.set(card_number, value, self.ttl).await;
    }
}
