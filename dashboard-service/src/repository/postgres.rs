//! Postgres-backed implementation of [`super::DashboardRepository`].
//! Runtime-checked queries (`sqlx::query_scalar`) against the tables owned
//! by `saldo-service`/`topup-service`/`withdraw-service`/
//! `transaction-service`/`transfer-service` — the dashboard aggregator
//! reads them directly rather than hopping through each service's RPC
//! façade, matching spec §4.8's "fan-out across several repository
//! totals."

use async_trait::async_trait;
use sqlx::PgPool;

use super::DashboardRepository;

#[derive(Clone)]
pub struct PgDashboardRepository {
    pool: PgPool,
}

impl PgDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for PgDashboardRepository {
    async fn get_total_balance(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(total_balance), 0)::bigint FROM saldos WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
    }

    async fn get_total_topup_amount(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(topup_amount), 0)::bigint FROM topups WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
    }

    async fn get_total_withdraw_amount(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(withdraw_amount), 0)::bigint FROM withdraws WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
    }

    async fn get_total_transaction_amount(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(transaction_amount), 0)::bigint FROM transactions WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_transfer_amount(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(transfer_amount), 0)::bigint FROM transfers WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
    }

    async fn get_total_balance_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(total_balance), 0)::bigint FROM saldos WHERE card_number = $1 AND deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_topup_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(topup_amount), 0)::bigint FROM topups WHERE card_number = $1 AND deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_withdraw_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(withdraw_amount), 0)::bigint FROM withdraws WHERE card_number = $1 AND deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_transaction_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(transaction_amount), 0)::bigint FROM transactions WHERE card_number = $1 AND deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_transfer_amount_sender_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(transfer_amount), 0)::bigint FROM transfers WHERE transfer_from = $1 AND deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_transfer_amount_receiver_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(transfer_amount), 0)::bigint FROM transfers WHERE transfer_to = $1 AND deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }
}
