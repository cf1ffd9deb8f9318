//! Core entity owned by the merchant service (spec §3.1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Soft-deletable. `api_key` is globally unique and used as an alternate
/// lookup key alongside `id` (spec §3.1).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Merchant {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub api_key: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewMerchant {
    pub name: String,
    pub user_id: Uuid,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct UpdateMerchant {
    pub name: String,
}

/// One row per `(year, month)` or `(year)` bucket of an aggregated amount,
/// shared by every statistics query across the entity services.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AmountByPeriod {
    pub period: i32,
    pub total_amount: i64,
}

/// One row per `(period, payment_method)` bucket (spec §6.1's
/// `{Monthly|Yearly}PaymentMethod` family).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentMethodAmount {
    pub period: i32,
    pub payment_method: String,
    pub total_amount: i64,
}
