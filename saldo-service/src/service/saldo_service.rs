//! Saldo service (C6): command, query, and statistics methods, each
//! following the CQRS-lite recipe of spec §4.6 exactly.
//!
//! Saldo rows are normally created as a side effect of `card-service`'s
//! `CreateCard` (spec §3.1/§6.2): the consumer draining
//! `saldo-service-topic-create-saldo` calls [`SaldoService::create`]
//! directly with the event payload. The command is also exposed at the RPC
//! façade for administrative use; no outbound event is published here.

use std::sync::Arc;
use uuid::Uuid;

use shared::cache::{card_year_fingerprint, list_fingerprint, year_fingerprint};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::telemetry::MetricsRegistry;

use crate::cache::SaldoCache;
use crate::domain::dto::{
    AmountByPeriodResponse, FindAllResponse, SaldoResponse, SaldoResponseDeleteAt,
};
use crate::domain::entities::{NewSaldo, UpdateSaldo};
use crate::domain::mapper::{to_amount_by_period_response, to_saldo_response, to_saldo_response_delete_at, to_saldos_response};
use crate::errors::saldo_errors;
use crate::repository::{SaldoCommandRepository, SaldoQueryRepository, SaldoStatsRepository};

pub struct SaldoService {
    query: Arc<dyn SaldoQueryRepository>,
    command: Arc<dyn SaldoCommandRepository>,
    stats: Arc<dyn SaldoStatsRepository>,
    cache: SaldoCache,
    metrics: Arc<MetricsRegistry>,
}

impl SaldoService {
    pub fn new(
        query: Arc<dyn SaldoQueryRepository>,
        command: Arc<dyn SaldoCommandRepository>,
        stats: Arc<dyn SaldoStatsRepository>,
        cache: SaldoCache,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self { query, command, stats, cache, metrics }
    }

    pub async fn find_all(&self, req: &crate::domain::dto::FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindAll", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "all");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("saldo find_all cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_all(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = FindAllResponse { records: to_saldos_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("saldo find_all ok", &[("total", &total.to_string())]);
        Ok(response)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<SaldoResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        if let Some(cached) = self.cache.get_by_id(id).await {
            envelope.success("saldo find_by_id cache hit", &[]);
            return Ok(cached);
        }

        let saldo = match self.query.find_by_id(id).await {
            Ok(Some(s)) => s,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "saldo not found", saldo_errors::err_saldo_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = to_saldo_response(&saldo);
        self.cache.set_by_id(id, &response).await;
        envelope.success("saldo find_by_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_card_number(&self, card_number: &str) -> Result<SaldoResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByCardNumber", &[]);

        if let Some(cached) = self.cache.get_by_card_number(card_number).await {
            envelope.success("saldo find_by_card_number cache hit", &[]);
            return Ok(cached);
        }

        let saldo = match self.query.find_by_card_number(card_number).await {
            Ok(Some(s)) => s,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "saldo not found", saldo_errors::err_saldo_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = to_saldo_response(&saldo);
        self.cache.set_by_card_number(card_number, &response).await;
        envelope.success("saldo find_by_card_number ok", &[]);
        Ok(response)
    }

    pub async fn find_by_active(&self, req: &crate::domain::dto::FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByActive", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "active");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("saldo find_by_active cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_active(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = FindAllResponse { records: to_saldos_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("saldo find_by_active ok", &[]);
        Ok(response)
    }

    pub async fn find_by_trashed(&self, req: &crate::domain::dto::FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByTrashed", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "trashed");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("saldo find_by_trashed cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_trashed(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = FindAllResponse { records: to_saldos_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("saldo find_by_trashed ok", &[]);
        Ok(response)
    }

    /// Consumes `saldo-service-topic-create-saldo` (directly, or via the
    /// administrative RPC route). Idempotency of the underlying consumer
    /// loop is out of scope (spec §1 process bootstrap).
    pub async fn create(&self, new_saldo: NewSaldo) -> Result<SaldoResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "CreateSaldo", &[]);

        let saldo = match self.command.create(new_saldo).await {
            Ok(s) => s,
            Err(err) if is_unique_violation(&err) => {
                return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_already_exists()))
            }
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_create_saldo())),
        };

        self.cache.delete_by_card_number(&saldo.card_number).await;
        let response = to_saldo_response(&saldo);
        envelope.success("saldo created", &[("id", &saldo.id.to_string())]);
        Ok(response)
    }

    pub async fn update(&self, id: Uuid, update: UpdateSaldo) -> Result<SaldoResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Update", &[("id", &id.to_string())]);

        let saldo = match self.command.update(id, update).await {
            Ok(Some(s)) => s,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "saldo not found", saldo_errors::err_saldo_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_update_saldo())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&saldo.card_number).await;
        let response = to_saldo_response(&saldo);
        envelope.success("saldo updated", &[]);
        Ok(response)
    }

    pub async fn trashed(&self, id: Uuid) -> Result<SaldoResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "TrashedSaldo", &[("id", &id.to_string())]);

        let saldo = match self.command.trashed(id).await {
            Ok(Some(s)) => s,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "saldo not found", saldo_errors::err_saldo_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_trashed_saldo())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&saldo.card_number).await;
        let response = to_saldo_response_delete_at(&saldo);
        envelope.success("saldo trashed", &[]);
        Ok(response)
    }

    pub async fn restore(&self, id: Uuid) -> Result<SaldoResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreSaldo", &[("id", &id.to_string())]);

        let saldo = match self.command.restore(id).await {
            Ok(Some(s)) => s,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "saldo not found", saldo_errors::err_saldo_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_restore_saldo())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&saldo.card_number).await;
        let response = to_saldo_response_delete_at(&saldo);
        envelope.success("saldo restored", &[]);
        Ok(response)
    }

    pub async fn delete_permanent(&self, id: Uuid) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteSaldoPermanent", &[("id", &id.to_string())]);

        let existing = match self.query.find_by_id(id).await {
            Ok(Some(s)) => s,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "saldo not found", saldo_errors::err_saldo_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_delete_saldo_permanent())),
        };
        if existing.deleted_at.is_none() {
            return Err(envelope.fail(ErrorKind::NotFound, "saldo is not trashed", saldo_errors::err_saldo_not_trashed()));
        }

        let deleted = match self.command.delete_permanent(id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_delete_saldo_permanent())),
        };
        if !deleted {
            return Err(envelope.fail(ErrorKind::NotFound, "saldo not found", saldo_errors::err_saldo_not_found()));
        }

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&existing.card_number).await;
        envelope.success("saldo permanently deleted", &[]);
        Ok(())
    }

    pub async fn restore_all(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreAllSaldo", &[]);
        if let Err(err) = self.command.restore_all().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_restore_saldo()));
        }
        envelope.success("all trashed saldos restored", &[]);
        Ok(())
    }

    pub async fn delete_all_permanent(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteAllSaldoPermanent", &[]);
        if let Err(err) = self.command.delete_all_permanent().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_failed_delete_saldo_permanent()));
        }
        envelope.success("all trashed saldos purged", &[]);
        Ok(())
    }

    pub async fn get_monthly_balance(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyBalance", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_balance:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("saldo monthly balance cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_balance(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("saldo monthly balance ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_balance(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyBalance", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_balance:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("saldo yearly balance cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_balance(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("saldo yearly balance ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyBalanceByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_balance_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("saldo monthly balance by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_balance_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("saldo monthly balance by card ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyBalanceByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_balance_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("saldo yearly balance by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_balance_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("saldo yearly balance by card ok", &[]);
        Ok(response)
    }

    pub async fn get_total_balance(&self) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalBalance", &[]);
        match self.stats.get_total_balance().await {
            Ok(total) => {
                envelope.success("saldo total balance ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        }
    }

    pub async fn get_total_balance_by_card_number(&self, card_number: &str) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalBalanceByCardNumber", &[]);
        match self.stats.get_total_balance_by_card_number(card_number).await {
            Ok(total) => {
                envelope.success("saldo total balance by card ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), saldo_errors::err_saldo_not_found())),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
