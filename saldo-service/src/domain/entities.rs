//! Core entity owned by the saldo service (spec §3.1): "(card_number,
//! total_balance). Created as a side-effect of Card creation (§4.7) with
//! zero balance."

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Saldo {
    pub id: Uuid,
    pub card_number: String,
    pub total_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewSaldo {
    pub card_number: String,
    pub total_balance: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateSaldo {
    pub total_balance: i64,
}

/// One row per `(year, month)` or `(year)` bucket of an aggregated amount,
/// shared by every statistics query across the entity services.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AmountByPeriod {
    pub period: i32,
    pub total_amount: i64,
}
