//! Core entity owned by the withdraw service (spec §3.1): "(id,
//! card_number(s), amount, timestamps, status, optional method). Amounts
//! are non-negative integers in minor units."

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Withdraw {
    pub id: Uuid,
    pub card_number: String,
    pub withdraw_amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewWithdraw {
    pub card_number: String,
    pub withdraw_amount: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateWithdraw {
    pub withdraw_amount: i64,
}

/// One row per `(year, month)` or `(year)` bucket of an aggregated amount,
/// shared by every statistics query across the entity services.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AmountByPeriod {
    pub period: i32,
    pub total_amount: i64,
}
