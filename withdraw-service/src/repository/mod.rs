//! Narrow repository interfaces (C4): query, command, and statistics
//! (spec §4.4: `X ∈ {..., WithdrawAmount}`).

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{AmountByPeriod, NewWithdraw, UpdateWithdraw, Withdraw};

#[async_trait]
pub trait WithdrawQueryRepository: Send + Sync {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Withdraw>, i64), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Withdraw>, sqlx::Error>;
    async fn find_by_card_number(&self, card_number: &str) -> Result<Vec<Withdraw>, sqlx::Error>;
    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Withdraw>, i64), sqlx::Error>;
    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Withdraw>, i64), sqlx::Error>;
}

#[async_trait]
pub trait WithdrawCommandRepository: Send + Sync {
    async fn create(&self, new_withdraw: NewWithdraw) -> Result<Withdraw, sqlx::Error>;
    async fn update(&self, id: Uuid, update: UpdateWithdraw) -> Result<Option<Withdraw>, sqlx::Error>;
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Withdraw>, sqlx::Error>;
    async fn trashed(&self, id: Uuid) -> Result<Option<Withdraw>, sqlx::Error>;
    async fn restore(&self, id: Uuid) -> Result<Option<Withdraw>, sqlx::Error>;
    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn restore_all(&self) -> Result<(), sqlx::Error>;
    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait WithdrawStatsRepository: Send + Sync {
    async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_monthly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_total_amount(&self) -> Result<i64, sqlx::Error>;
    async fn get_total_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
}
