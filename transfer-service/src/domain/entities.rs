//! Core entity owned by the transfer service (spec §3.1): "(id,
//! card_number(s), amount, timestamps, status, optional method)." Transfer
//! is the one entity with two card numbers — sender and receiver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Transfer {
    pub id: Uuid,
    pub transfer_from: String,
    pub transfer_to: String,
    pub transfer_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub transfer_from: String,
    pub transfer_to: String,
    pub transfer_amount: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateTransfer {
    pub transfer_amount: i64,
}

/// One row per `(year, month)` or `(year)` bucket of an aggregated amount,
/// shared by every statistics query across the entity services.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AmountByPeriod {
    pub period: i32,
    pub total_amount: i64,
}
