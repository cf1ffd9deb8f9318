//! Response DTOs (C5) and request shapes accepted by the RPC façade (C10).

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaldoResponse {
    pub id: Uuid,
    pub card_number: String,
    pub total_balance: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Same as [`SaldoResponse`] plus `deleted_at`, used by `FindByTrashed` and
/// the trashed/restore command responses (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaldoResponseDeleteAt {
    #[serde(flatten)]
    pub saldo: SaldoResponse,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindAllRequest {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub search: String,
}

impl FindAllRequest {
    /// Clamps `page`/`page_size` per spec §3.1: "Server clamps page<-1,
    /// page_size<-10 when <=0."
    pub fn clamped(&self) -> (i64, i64, String) {
        let page = if self.page <= 0 { 1 } else { self.page };
        let page_size = if self.page_size <= 0 { 10 } else { self.page_size };
        (page, page_size, self.search.trim().to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FindAllResponse {
    pub records: Vec<SaldoResponse>,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSaldoRequest {
    #[validate(length(min = 1, max = 32))]
    pub card_number: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub total_balance: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSaldoRequest {
    #[validate(range(min = 0))]
    pub total_balance: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AmountByPeriodResponse {
    pub period: i32,
    pub total_amount: i64,
}
