//! Postgres-backed implementations of the repository traits in
//! [`super`]. Runtime-checked queries (`sqlx::query_as::<_, T>`), matching
//! the teacher's pattern throughout `*-service/src/repository/*.rs`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{SaldoCommandRepository, SaldoQueryRepository, SaldoStatsRepository};
use crate::domain::entities::{AmountByPeriod, NewSaldo, Saldo, UpdateSaldo};

const SALDO_COLUMNS: &str = "id, card_number, total_balance, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgSaldoRepository {
    pool: PgPool,
}

impl PgSaldoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, where_clause: &str, search: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT count(*) FROM saldos WHERE {where_clause} AND lower(card_number) LIKE lower($1)");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(format!("%{search}%"))
            .fetch_one(&self.pool)
            .await
    }

    async fn page(&self, where_clause: &str, page: i64, page_size: i64, search: &str) -> Result<(Vec<Saldo>, i64), sqlx::Error> {
        let sql = format!(
            "SELECT {SALDO_COLUMNS} FROM saldos WHERE {where_clause} AND lower(card_number) LIKE lower($1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let records = sqlx::query_as::<_, Saldo>(&sql)
            .bind(format!("%{search}%"))
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(&self.pool)
            .await?;
        let total = self.count(where_clause, search).await?;
        Ok((records, total))
    }
}

#[async_trait]
impl SaldoQueryRepository for PgSaldoRepository {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Saldo>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL", page, page_size, search).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Saldo>, sqlx::Error> {
        sqlx::query_as::<_, Saldo>(&format!("SELECT {SALDO_COLUMNS} FROM saldos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_card_number(&self, card_number: &str) -> Result<Option<Saldo>, sqlx::Error> {
        sqlx::query_as::<_, Saldo>(&format!(
            "SELECT {SALDO_COLUMNS} FROM saldos WHERE card_number = $1 AND deleted_at IS NULL"
        ))
        .bind(card_number)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Saldo>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL", page, page_size, search).await
    }

    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Saldo>, i64), sqlx::Error> {
        self.page("deleted_at IS NOT NULL", page, page_size, search).await
    }
}

#[async_trait]
impl SaldoCommandRepository for PgSaldoRepository {
    async fn create(&self, new_saldo: NewSaldo) -> Result<Saldo, sqlx::Error> {
        sqlx::query_as::<_, Saldo>(&format!(
            "INSERT INTO saldos (id, card_number, total_balance, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $4, NULL) \
             RETURNING {SALDO_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_saldo.card_number)
        .bind(new_saldo.total_balance)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: Uuid, update: UpdateSaldo) -> Result<Option<Saldo>, sqlx::Error> {
        sqlx::query_as::<_, Saldo>(&format!(
            "UPDATE saldos SET total_balance = $2, updated_at = $3 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {SALDO_COLUMNS}"
        ))
        .bind(id)
        .bind(update.total_balance)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn trashed(&self, id: Uuid) -> Result<Option<Saldo>, sqlx::Error> {
        sqlx::query_as::<_, Saldo>(&format!(
            "UPDATE saldos SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {SALDO_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn restore(&self, id: Uuid) -> Result<Option<Saldo>, sqlx::Error> {
        sqlx::query_as::<_, Saldo>(&format!(
            "UPDATE saldos SET deleted_at = NULL, updated_at = $2 WHERE id = $1 AND deleted_at IS NOT NULL \
             RETURNING {SALDO_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM saldos WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore_all(&self) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE saldos SET deleted_at = NULL WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM saldos WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SaldoStatsRepository for PgSaldoRepository {
    async fn get_monthly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM s.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM saldos s WHERE EXTRACT(YEAR FROM s.created_at) = $1 AND s.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM s.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM saldos s WHERE EXTRACT(YEAR FROM s.created_at) <= $1 AND s.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM s.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM saldos s WHERE s.card_number = $1 AND EXTRACT(YEAR FROM s.created_at) = $2 AND s.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(card_number)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM s.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM saldos s WHERE s.card_number = $1 AND EXTRACT(YEAR FROM s.created_at) <= $2 AND s.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(card_number)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_total_balance(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(total_balance), 0)::bigint FROM saldos WHERE deleted_at IS NULL")
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
}
