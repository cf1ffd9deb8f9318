//! Postgres-backed implementations of the repository traits in
//! [`super`]. Runtime-checked queries (`sqlx::query_as::<_, T>`), matching
//! the teacher's pattern throughout `*-service/src/repository/*.rs`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{TopupCommandRepository, TopupQueryRepository, TopupStatsRepository};
use crate::domain::entities::{AmountByMethod, AmountByPeriod, NewTopup, Topup, UpdateTopup};

const TOPUP_COLUMNS: &str = "id, card_number, topup_amount, topup_method, status, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgTopupRepository {
    pool: PgPool,
}

impl PgTopupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, where_clause: &str, search: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT count(*) FROM topups WHERE {where_clause} AND lower(card_number) LIKE lower($1)");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(format!("%{search}%"))
            .fetch_one(&self.pool)
            .await
    }

    async fn page(&self, where_clause: &str, page: i64, page_size: i64, search: &str) -> Result<(Vec<Topup>, i64), sqlx::Error> {
        let sql = format!(
            "SELECT {TOPUP_COLUMNS} FROM topups WHERE {where_clause} AND lower(card_number) LIKE lower($1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let records = sqlx::query_as::<_, Topup>(&sql)
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
impl TopupQueryRepository for PgTopupRepository {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Topup>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL", page, page_size, search).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Topup>, sqlx::Error> {
        sqlx::query_as::<_, Topup>(&format!("SELECT {TOPUP_COLUMNS} FROM topups WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_card_number(&self, card_number: &str) -> Result<Vec<Topup>, sqlx::Error> {
        sqlx::query_as::<_, Topup>(&format!(
            "SELECT {TOPUP_COLUMNS} FROM topups WHERE card_number = $1 AND deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .bind(card_number)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Topup>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL AND status = 'success'", page, page_size, search).await
    }

    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Topup>, i64), sqlx::Error> {
        self.page("deleted_at IS NOT NULL", page, page_size, search).await
    }
}

#[async_trait]
impl TopupCommandRepository for PgTopupRepository {
    async fn create(&self, new_topup: NewTopup) -> Result<Topup, sqlx::Error> {
        sqlx::query_as::<_, Topup>(&format!(
            "INSERT INTO topups (id, card_number, topup_amount, topup_method, status, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, 'success', $5, $5, NULL) \
             RETURNING {TOPUP_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_topup.card_number)
        .bind(new_topup.topup_amount)
        .bind(&new_topup.topup_method)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: Uuid, update: UpdateTopup) -> Result<Option<Topup>, sqlx::Error> {
        sqlx::query_as::<_, Topup>(&format!(
            "UPDATE topups SET topup_amount = $2, topup_method = $3, updated_at = $4 \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {TOPUP_COLUMNS}"
        ))
        .bind(id)
        .bind(update.topup_amount)
        .bind(&update.topup_method)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Topup>, sqlx::Error> {
        sqlx::query_as::<_, Topup>(&format!(
            "UPDATE topups SET status = $2, updated_at = $3 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {TOPUP_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn trashed(&self, id: Uuid) -> Result<Option<Topup>, sqlx::Error> {
        sqlx::query_as::<_, Topup>(&format!(
            "UPDATE topups SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {TOPUP_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn restore(&self, id: Uuid) -> Result<Option<Topup>, sqlx::Error> {
        sqlx::query_as::<_, Topup>(&format!(
            "UPDATE topups SET deleted_at = NULL, updated_at = $2 WHERE id = $1 AND deleted_at IS NOT NULL \
             RETURNING {TOPUP_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM topups WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore_all(&self) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE topups SET deleted_at = NULL WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM topups WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TopupStatsRepository for PgTopupRepository {
    async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM created_at)::int AS period, COALESCE(SUM(topup_amount), 0)::bigint AS total_amount \
             FROM topups WHERE EXTRACT(YEAR FROM created_at) = $1 AND deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM created_at)::int AS period, COALESCE(SUM(topup_amount), 0)::bigint AS total_amount \
             FROM topups WHERE EXTRACT(YEAR FROM created_at) <= $1 AND deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM created_at)::int AS period, COALESCE(SUM(topup_amount), 0)::bigint AS total_amount \
             FROM topups WHERE card_number = $1 AND EXTRACT(YEAR FROM created_at) = $2 AND deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(card_number)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM created_at)::int AS period, COALESCE(SUM(topup_amount), 0)::bigint AS total_amount \
             FROM topups WHERE card_number = $1 AND EXTRACT(YEAR FROM created_at) <= $2 AND deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(card_number)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_method(&self, year: i32) -> Result<Vec<AmountByMethod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByMethod>(
            "SELECT topup_method AS method, COALESCE(SUM(topup_amount), 0)::bigint AS total_amount \
             FROM topups WHERE EXTRACT(YEAR FROM created_at) = $1 AND deleted_at IS NULL \
             GROUP BY topup_method ORDER BY topup_method",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_method(&self, year: i32) -> Result<Vec<AmountByMethod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByMethod>(
            "SELECT topup_method AS method, COALESCE(SUM(topup_amount), 0)::bigint AS total_amount \
             FROM topups WHERE EXTRACT(YEAR FROM created_at) <= $1 AND deleted_at IS NULL \
             GROUP BY topup_method ORDER BY topup_method",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_total_amount(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(topup_amount), 0)::bigint FROM topups WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await
    }

    async fn get_total_amount_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(topup_amount), 0)::bigint FROM topups WHERE card_number = $1 AND deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }
}
