//! Core entity owned by the transaction service (spec §3.1): "(id,
//! card_number(s), amount, timestamps, status, optional method). Amounts
//! are non-negative integers in minor units."

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub card_number: String,
    pub transaction_amount: i64,
    pub transaction_method: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub card_number: String,
    pub transaction_amount: i64,
    pub transaction_method: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateTransaction {
    pub transaction_amount: i64,
    pub transaction_method: Option<String>,
}

/// One row per `(year, month)` or `(year)` bucket of an aggregated amount,
/// shared by every statistics query across the entity services.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AmountByPeriod {
    pub period: i32,
    pub total_amount: i64,
}
