//! Narrow repository interfaces (C4): query, command, and the balance
//! statistics family named in spec §4.4 (`X ∈ {Balance, ...}`).

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{AmountByPeriod, NewSaldo, Saldo, UpdateSaldo};

#[async_trait]
pub trait SaldoQueryRepository: Send + Sync {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Saldo>, i64), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Saldo>, sqlx::Error>;
    async fn find_by_card_number(&self, card_number: &str) -> Result<Option<Saldo>, sqlx::Error>;
    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Saldo>, i64), sqlx::Error>;
    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Saldo>, i64), sqlx::Error>;
}

#[async_trait]
pub trait SaldoCommandRepository: Send + Sync {
    async fn create(&self, new_saldo: NewSaldo) -> Result<Saldo, sqlx::Error>;
    async fn update(&self, id: Uuid, update: UpdateSaldo) -> Result<Option<Saldo>, sqlx::Error>;
    async fn trashed(&self, id: Uuid) -> Result<Option<Saldo>, sqlx::Error>;
    async fn restore(&self, id: Uuid) -> Result<Option<Saldo>, sqlx::Error>;
    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn restore_all(&self) -> Result<(), sqlx::Error>;
    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error>;
}

#[async_trait]
pub trait SaldoStatsRepository: Send + Sync {
    async fn get_monthly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_monthly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_total_balance(&self) -> Result<i64, sqlx::Error>;
    async fn get_total_balance_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
}
