//! Postgres-backed implementations of the repository traits in
//! [`super`]. Runtime-checked queries (`sqlx::query_as::<_, T>`), matching
//! the teacher's pattern throughout `*-service/src/repository/*.rs`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CardCommandRepository, CardQueryRepository, CardStatsRepository};
use crate::domain::entities::{AmountByPeriod, Card, NewCard, UpdateCard};

const CARD_COLUMNS: &str = "id, user_id, card_number, holder_name, card_type, expire_date, \
     cvv, status, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgCardRepository {
    pool: PgPool,
}

impl PgCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, where_clause: &str, search: &str) -> Result<i64, sqlx::Error> {
        let sql = format!(
            "SELECT count(*) FROM cards WHERE {where_clause} AND \
             (lower(holder_name) LIKE lower($1) OR lower(card_number) LIKE lower($1))"
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(format!("%{search}%"))
            .fetch_one(&self.pool)
            .await
    }

    async fn page(&self, where_clause: &str, page: i64, page_size: i64, search: &str) -> Result<(Vec<Card>, i64), sqlx::Error> {
        let sql = format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE {where_clause} AND \
             (lower(holder_name) LIKE lower($1) OR lower(card_number) LIKE lower($1)) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let records = sqlx::query_as::<_, Card>(&sql)
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
impl CardQueryRepository for PgCardRepository {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Card>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL", page, page_size, search).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE user_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_card_number(&self, card_number: &str) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE card_number = $1 AND deleted_at IS NULL"
        ))
        .bind(card_number)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Card>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL AND status = 'active'", page, page_size, search).await
    }

    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Card>, i64), sqlx::Error> {
        self.page("deleted_at IS NOT NULL", page, page_size, search).await
    }
}

#[async_trait]
impl CardCommandRepository for PgCardRepository {
    async fn create(&self, new_card: NewCard) -> Result<Card, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!(
            "INSERT INTO cards (id, user_id, card_number, holder_name, card_type, expire_date, \
             cvv, status, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8, $8, NULL) \
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new_card.user_id)
        .bind(&new_card.card_number)
        .bind(&new_card.holder_name)
        .bind(&new_card.card_type)
        .bind(new_card.expire_date)
        .bind(&new_card.cvv)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: Uuid, update: UpdateCard) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET holder_name = $2, card_type = $3, expire_date = $4, cvv = $5, \
             updated_at = $6 WHERE id = $1 AND deleted_at IS NULL RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.holder_name)
        .bind(&update.card_type)
        .bind(update.expire_date)
        .bind(&update.cvv)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET status = $2, updated_at = $3 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn trashed(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn restore(&self, id: Uuid) -> Result<Option<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET deleted_at = NULL, updated_at = $2 WHERE id = $1 AND deleted_at IS NOT NULL \
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        // §9 open question pinned narrower: only a row already carrying
        // `deleted_at` is eligible (see DESIGN.md).
        let result = sqlx::query("DELETE FROM cards WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore_all(&self) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE cards SET deleted_at = NULL WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM cards WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CardStatsRepository for PgCardRepository {
    async fn get_monthly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM c.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM cards c JOIN saldos s ON s.card_number = c.card_number \
             WHERE EXTRACT(YEAR FROM c.created_at) = $1 AND c.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_balance(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM c.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM cards c JOIN saldos s ON s.card_number = c.card_number \
             WHERE EXTRACT(YEAR FROM c.created_at) <= $1 AND c.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM c.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM cards c JOIN saldos s ON s.card_number = c.card_number \
             WHERE c.card_number = $1 AND EXTRACT(YEAR FROM c.created_at) = $2 AND c.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(card_number)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM c.created_at)::int AS period, COALESCE(SUM(s.total_balance), 0)::bigint AS total_amount \
             FROM cards c JOIN saldos s ON s.card_number = c.card_number \
             WHERE c.card_number = $1 AND EXTRACT(YEAR FROM c.created_at) <= $2 AND c.deleted_at IS NULL \
             GROUP BY period ORDER BY period",
        )
        .bind(card_number)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_total_balance(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(s.total_balance), 0)::bigint FROM cards c \
             JOIN saldos s ON s.card_number = c.card_number WHERE c.deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_balance_by_card_number(&self, card_number: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(s.total_balance), 0)::bigint FROM cards c \
             JOIN saldos s ON s.card_number = c.card_number WHERE c.card_number = $1 AND c.deleted_at IS NULL",
        )
        .bind(card_number)
        .fetch_one(&self.pool)
        .await
    }
}
