//! Narrow repository interfaces (C4): query, command, and statistics
//! (the "dashboard family" named in spec §6.1). Methods return
//! `Option<T>`/`T` or a transport-neutral `sqlx::Error`; the service layer
//! classifies absence vs. failure, not the repository.

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{AmountByPeriod, Card, NewCard, UpdateCard};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardQueryRepository: Send + Sync {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Card>, i64), sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Card>, sqlx::Error>;
    async fn find_by_card_number(&self, card_number: &str) -> Result<Option<Card>, sqlx::Error>;
    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Card>, i64), sqlx::Error>;
    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Card>, i64), sqlx::Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardCommandRepository: Send + Sync {
    async fn create(&self, new_card: NewCard) -> Result<Card, sqlx::Error>;
    async fn update(&self, id: Uuid, update: UpdateCard) -> Result<Option<Card>, sqlx::Error>;
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Card>, sqlx::Error>;
    async fn trashed(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error>;
    async fn restore(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error>;
    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn restore_all(&self) -> Result<(), sqlx::Error>;
    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error>;
}

/// Statistics + dashboard family (spec §4.4: `GetMonthlyX`/`GetYearlyX` and
/// `ByCardNumber` variants; dashboard totals). Card-service's own
/// statistic is balance, read from the `saldo` table it shares the
/// database with — the repository boundary, not a second database, is
/// what keeps the service logically independent (spec §1 "database ...
/// treated as external and accessed through narrow repository
/// interfaces").
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardStatsRepository: Send + Sync {
    async fn get_monthly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_monthly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_yearly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error>;
    async fn get_total_balance(&self) -> Result<i64, sqlx::Error>;
    async fn get_total_balance_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
}
