//! Postgres-backed implementations of the repository traits in
//! [`super`]. Runtime-checked queries (`sqlx::query_as::<_, T>`), matching
//! the teacher's pattern throughout `*-service/src/repository/*.rs`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{MerchantCommandRepository, MerchantQueryRepository, MerchantStatsRepository};
use crate::domain::entities::{AmountByPeriod, Merchant, NewMerchant, PaymentMethodAmount, UpdateMerchant};

const MERCHANT_COLUMNS: &str = "id, name, user_id, api_key, status, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgMerchantRepository {
    pool: PgPool,
}

impl PgMerchantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, where_clause: &str, search: &str) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT count(*) FROM merchants WHERE {where_clause} AND lower(name) LIKE lower($1)");
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(format!("%{search}%"))
            .fetch_one(&self.pool)
            .await
    }

    async fn page(&self, where_clause: &str, page: i64, page_size: i64, search: &str) -> Result<(Vec<Merchant>, i64), sqlx::Error> {
        let sql = format!(
            "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE {where_clause} AND lower(name) LIKE lower($1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let records = sqlx::query_as::<_, Merchant>(&sql)
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
impl MerchantQueryRepository for PgMerchantRepository {
    async fn find_all(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Merchant>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL", page, page_size, search).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!("SELECT {MERCHANT_COLUMNS} FROM merchants WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE api_key = $1 AND deleted_at IS NULL"
        ))
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "SELECT {MERCHANT_COLUMNS} FROM merchants WHERE user_id = $1 AND deleted_at IS NULL ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_active(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Merchant>, i64), sqlx::Error> {
        self.page("deleted_at IS NULL AND status = 'active'", page, page_size, search).await
    }

    async fn find_by_trashed(&self, page: i64, page_size: i64, search: &str) -> Result<(Vec<Merchant>, i64), sqlx::Error> {
        self.page("deleted_at IS NOT NULL", page, page_size, search).await
    }
}

#[async_trait]
impl MerchantCommandRepository for PgMerchantRepository {
    async fn create(&self, new_merchant: NewMerchant) -> Result<Merchant, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "INSERT INTO merchants (id, name, user_id, api_key, status, created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, 'active', $5, $5, NULL) \
             RETURNING {MERCHANT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_merchant.name)
        .bind(new_merchant.user_id)
        .bind(&new_merchant.api_key)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: Uuid, update: UpdateMerchant) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "UPDATE merchants SET name = $2, updated_at = $3 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {MERCHANT_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.name)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "UPDATE merchants SET status = $2, updated_at = $3 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {MERCHANT_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn trashed(&self, id: Uuid) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "UPDATE merchants SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {MERCHANT_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn restore(&self, id: Uuid) -> Result<Option<Merchant>, sqlx::Error> {
        sqlx::query_as::<_, Merchant>(&format!(
            "UPDATE merchants SET deleted_at = NULL, updated_at = $2 WHERE id = $1 AND deleted_at IS NOT NULL \
             RETURNING {MERCHANT_COLUMNS}"
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_permanent(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM merchants WHERE id = $1 AND deleted_at IS NOT NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore_all(&self) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE merchants SET deleted_at = NULL WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all_permanent(&self) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM merchants WHERE deleted_at IS NOT NULL")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MerchantStatsRepository for PgMerchantRepository {
    async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM t.created_at)::int AS period, COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE EXTRACT(YEAR FROM t.created_at) = $1 \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM t.created_at)::int AS period, COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE EXTRACT(YEAR FROM t.created_at) <= $1 \
             GROUP BY period ORDER BY period",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM t.created_at)::int AS period, COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE t.merchant_id = $1 AND EXTRACT(YEAR FROM t.created_at) = $2 \
             GROUP BY period ORDER BY period",
        )
        .bind(merchant_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM t.created_at)::int AS period, COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE t.merchant_id = $1 AND EXTRACT(YEAR FROM t.created_at) <= $2 \
             GROUP BY period ORDER BY period",
        )
        .bind(merchant_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(MONTH FROM t.created_at)::int AS period, COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t JOIN merchants m ON m.id = t.merchant_id \
             WHERE m.api_key = $1 AND EXTRACT(YEAR FROM t.created_at) = $2 \
             GROUP BY period ORDER BY period",
        )
        .bind(api_key)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<AmountByPeriod>, sqlx::Error> {
        sqlx::query_as::<_, AmountByPeriod>(
            "SELECT EXTRACT(YEAR FROM t.created_at)::int AS period, COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t JOIN merchants m ON m.id = t.merchant_id \
             WHERE m.api_key = $1 AND EXTRACT(YEAR FROM t.created_at) <= $2 \
             GROUP BY period ORDER BY period",
        )
        .bind(api_key)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_payment_method(&self, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethodAmount>(
            "SELECT EXTRACT(MONTH FROM t.created_at)::int AS period, t.payment_method, \
             COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE EXTRACT(YEAR FROM t.created_at) = $1 \
             GROUP BY period, t.payment_method ORDER BY period, t.payment_method",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_payment_method(&self, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethodAmount>(
            "SELECT EXTRACT(YEAR FROM t.created_at)::int AS period, t.payment_method, \
             COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE EXTRACT(YEAR FROM t.created_at) <= $1 \
             GROUP BY period, t.payment_method ORDER BY period, t.payment_method",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_payment_method_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethodAmount>(
            "SELECT EXTRACT(MONTH FROM t.created_at)::int AS period, t.payment_method, \
             COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE t.merchant_id = $1 AND EXTRACT(YEAR FROM t.created_at) = $2 \
             GROUP BY period, t.payment_method ORDER BY period, t.payment_method",
        )
        .bind(merchant_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_payment_method_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethodAmount>(
            "SELECT EXTRACT(YEAR FROM t.created_at)::int AS period, t.payment_method, \
             COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t WHERE t.merchant_id = $1 AND EXTRACT(YEAR FROM t.created_at) <= $2 \
             GROUP BY period, t.payment_method ORDER BY period, t.payment_method",
        )
        .bind(merchant_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_monthly_payment_method_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethodAmount>(
            "SELECT EXTRACT(MONTH FROM t.created_at)::int AS period, t.payment_method, \
             COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t JOIN merchants m ON m.id = t.merchant_id \
             WHERE m.api_key = $1 AND EXTRACT(YEAR FROM t.created_at) = $2 \
             GROUP BY period, t.payment_method ORDER BY period, t.payment_method",
        )
        .bind(api_key)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_yearly_payment_method_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<PaymentMethodAmount>, sqlx::Error> {
        sqlx::query_as::<_, PaymentMethodAmount>(
            "SELECT EXTRACT(YEAR FROM t.created_at)::int AS period, t.payment_method, \
             COALESCE(SUM(t.amount), 0)::bigint AS total_amount \
             FROM transactions t JOIN merchants m ON m.id = t.merchant_id \
             WHERE m.api_key = $1 AND EXTRACT(YEAR FROM t.created_at) <= $2 \
             GROUP BY period, t.payment_method ORDER BY period, t.payment_method",
        )
        .bind(api_key)
        .bind(year)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_total_amount(&self, year: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(t.amount), 0)::bigint FROM transactions t WHERE EXTRACT(YEAR FROM t.created_at) = $1",
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(t.amount), 0)::bigint FROM transactions t \
             WHERE t.merchant_id = $1 AND EXTRACT(YEAR FROM t.created_at) = $2",
        )
        .bind(merchant_id)
        .bind(year)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_total_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(t.amount), 0)::bigint FROM transactions t JOIN merchants m ON m.id = t.merchant_id \
             WHERE m.api_key = $1 AND EXTRACT(YEAR FROM t.created_at) = $2",
        )
        .bind(api_key)
        .bind(year)
        .fetch_one(&self.pool)
        .await
    }
}
