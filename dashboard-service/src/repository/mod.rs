//! Narrow repository interface (C4) for the dashboard aggregator: one
//! method per dashboard total named in spec §4.4 ("Dashboard totals:
//! `GetTotalBalances`, `GetTotalTopAmount`, `GetTotalWithdrawAmount`,
//! `GetTotalTransactionAmount`, `GetTotalTransferAmount`, plus per-card
//! variants").

pub mod postgres;

use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn get_total_balance(&self) -> Result<i64, sqlx::Error>;
    async fn get_total_topup_amount(&self) -> Result<i64, sqlx::Error>;
    async fn get_total_withdraw_amount(&self) -> Result<i64, sqlx::Error>;
    async fn get_total_transaction_amount(&self) -> Result<i64, sqlx::Error>;
    async fn get_total_transfer_amount(&self) -> Result<i64, sqlx::Error>;

    async fn get_total_balance_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
    async fn get_total_topup_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
    async fn get_total_withdraw_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
    async fn get_total_transaction_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
    async fn get_total_transfer_amount_sender_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
    async fn get_total_transfer_amount_receiver_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error>;
}
