//! Narrow repository interfaces (C4): query, command, and the merchant
//! statistics family named in spec §6.1 (amount / total-amount / payment
//! method, each with `ByMerchants`/`ByApikeys` scoping variants).

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{AmountByPeriod, Merchant, NewMerchant, PaymentMethodAmount, UpdateMerchant};

#[async_trait]
pub trait MerchantQueryRepository: Send + Sync {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Merchant>, i64), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Merchant>, sqlx::Error>;
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Merchant>, sqlx::Error>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Merchant>, sqlx::Error>;
    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Merchant>, i64), sqlx::Error>;
    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Merchant>, i64), sqlx::Error>;
}

#[async_trait]
pub trait MerchantCommandRepository: Send + Sync {
    async fn create(&self, new_merchant: NewMerchant) -> Result<Merchant, sqlx::Error>;
    async fn update(&self, id: Uuid, update: UpdateMerchant) -> Result<Option<Merchant>, sqlx::Error>;
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Merchant>, sqlx::Error>;
    async fn trashed(&self, id: Uuid) -> Result<Option<Merchant>, sqlx::Error>;
    async fn restore(&self, id: Uuid) -> Result<Option<Merchant>, sqlx::Error>;
    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn restore_all(&self) -> Result<(), sqlx::Error>;
    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error>;
}

/// Merchant stats family (spec §6.1): `{Find}{Monthly|Yearly}{Amount|
/// TotalAmount|PaymentMethod}[{ByMerchants|ByApikeys}](year[, merchant_id|
/// api_key])`. Reads the `transactions` table joined on `merchant_id`
/// (spec §1: "database ... treated as external and accessed through
/// narrow repository interfaces" — the repository boundary, not a second
/// database, keeps merchant-service logically independent).
#[async_trait]
pub trait MerchantStatsRepository: Send + Sync {
    async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_monthly_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_monthly_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;

    async fn get_monthly_payment_method(&self, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error>;
    async fn get_yearly_payment_method(&self, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error>;
    async fn get_monthly_payment_method_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error>;
    async fn get_yearly_payment_method_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error>;
    async fn get_monthly_payment_method_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error>;
    async fn get_yearly_payment_method_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error>;

    async fn get_total_amount(&self, year: i32) -> Result<i64, sqlx::Error>;
    async fn get_total_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<i64, sqlx::Error>;
    async fn get_total_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<i64, sqlx::Error>;
}
