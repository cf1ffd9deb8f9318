//! Core entity owned by the card service (spec §3.1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Soft-deletable. `deleted_at` is set by `trashed`, cleared by `restore`,
/// and the row itself removed by `delete_permanent` (spec §3.1/§4.6). Card
/// number uniqueness holds only across non-deleted rows.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub user_id: Uuid,
    pub card_number: String,
    pub holder_name: String,
    pub card_type: String,
    pub expire_date: DateTime<Utc>,
    pub cvv: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub user_id: Uuid,
    pub card_number: String,
    pub holder_name: String,
    pub card_type: String,
    pub expire_date: DateTime<Utc>,
    pub cvv: String,
}

#[derive(Debug, Clone)]
pub struct UpdateCard {
    pub holder_name: String,
    pub card_type: String,
    pub expire_date: DateTime<Utc>,
    pub cvv: String,
}

/// One row per `(year, month)` or `(year)` bucket of an aggregated amount,
/// shared by every statistics query across the entity services.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AmountByPeriod {
    pub period: i32,
    pub total_amount: i64,
}
