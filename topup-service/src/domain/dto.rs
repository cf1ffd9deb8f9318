//! Response DTOs (C5) and request shapes accepted by the RPC façade (C10).

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupResponse {
    pub id: Uuid,
    pub card_number: String,
    pub topup_amount: i64,
    pub topup_method: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Same as [`TopupResponse`] plus `deleted_at`, used by `FindByTrashed` and
/// the trashed/restore command responses (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopupResponseDeleteAt {
    #[serde(flatten)]
    pub topup: TopupResponse,
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
    pub records: Vec<TopupResponse>,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopupRequest {
    #[validate(length(min = 1, max = 32))]
    pub card_number: String,
    #[validate(range(min = 1))]
    pub topup_amount: i64,
    #[validate(length(min = 1, max = 64))]
    pub topup_method: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTopupRequest {
    #[validate(range(min = 1))]
    pub topup_amount: i64,
    #[validate(length(min = 1, max = 64))]
    pub topup_method: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, max = 32))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AmountByPeriodResponse {
    pub period: i32,
    pub total_amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AmountByMethodResponse {
    pub method: String,
    pub total_amount: i64,
}
