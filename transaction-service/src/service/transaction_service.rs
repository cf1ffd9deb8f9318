//! Transaction service (C6): command, query, and statistics methods, each
//! following the CQRS-lite recipe of spec §4.6 exactly.

use std::sync::Arc;
use uuid::Uuid;

use shared::cache::{card_year_fingerprint, list_fingerprint, year_fingerprint};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::telemetry::MetricsRegistry;

use crate::cache::TransactionCache;
use crate::domain::dto::{
    AmountByPeriodResponse, FindAllRequest, FindAllResponse, TransactionResponse, TransactionResponseDeleteAt,
};
use crate::domain::entities::{NewTransaction, UpdateTransaction};
use crate::domain::mapper::{to_amount_by_period_response, to_transaction_response, to_transaction_response_delete_at, to_transactions_response};
use crate::errors::transaction_errors;
use crate::repository::{TransactionCommandRepository, TransactionQueryRepository, TransactionStatsRepository};

pub struct TransactionService {
    query: Arc<dyn TransactionQueryRepository>,
    command: Arc<dyn TransactionCommandRepository>,
    stats: Arc<dyn TransactionStatsRepository>,
    cache: TransactionCache,
    metrics: Arc<MetricsRegistry>,
}

impl TransactionService {
    pub fn new(
        query: Arc<dyn TransactionQueryRepository>,
        command: Arc<dyn TransactionCommandRepository>,
        stats: Arc<dyn TransactionStatsRepository>,
        cache: TransactionCache,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self { query, command, stats, cache, metrics }
    }

    pub async fn find_all(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindAll", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "all");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("transaction find_all cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_all(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = FindAllResponse { records: to_transactions_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("transaction find_all ok", &[("total", &total.to_string())]);
        Ok(response)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<TransactionResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        if let Some(cached) = self.cache.get_by_id(id).await {
            envelope.success("transaction find_by_id cache hit", &[]);
            return Ok(cached);
        }

        let transaction = match self.query.find_by_id(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transaction not found", transaction_errors::err_transaction_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = to_transaction_response(&transaction);
        self.cache.set_by_id(id, &response).await;
        envelope.success("transaction find_by_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_card_number(&self, card_number: &str) -> Result<Vec<TransactionResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByCardNumber", &[]);

        if let Some(cached) = self.cache.get_by_card_number(card_number).await {
            envelope.success("transaction find_by_card_number cache hit", &[]);
            return Ok(cached);
        }

        let transactions = match self.query.find_by_card_number(card_number).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = to_transactions_response(&transactions);
        self.cache.set_by_card_number(card_number, &response).await;
        envelope.success("transaction find_by_card_number ok", &[]);
        Ok(response)
    }

    pub async fn find_by_active(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByActive", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "active");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("transaction find_by_active cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_active(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = FindAllResponse { records: to_transactions_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("transaction find_by_active ok", &[]);
        Ok(response)
    }

    pub async fn find_by_trashed(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByTrashed", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "trashed");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("transaction find_by_trashed cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_trashed(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = FindAllResponse { records: to_transactions_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("transaction find_by_trashed ok", &[]);
        Ok(response)
    }

    pub async fn create(&self, new_transaction: NewTransaction) -> Result<TransactionResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "CreateTransaction", &[]);

        let transaction = match self.command.create(new_transaction).await {
            Ok(t) => t,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_create_transaction())),
        };

        self.cache.delete_by_card_number(&transaction.card_number).await;
        let response = to_transaction_response(&transaction);
        envelope.success("transaction created", &[("id", &transaction.id.to_string())]);
        Ok(response)
    }

    pub async fn update(&self, id: Uuid, update: UpdateTransaction) -> Result<TransactionResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Update", &[("id", &id.to_string())]);

        let transaction = match self.command.update(id, update).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transaction not found", transaction_errors::err_transaction_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_update_transaction())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transaction.card_number).await;
        let response = to_transaction_response(&transaction);
        envelope.success("transaction updated", &[]);
        Ok(response)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<TransactionResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "UpdateStatus", &[("id", &id.to_string())]);

        let transaction = match self.command.update_status(id, status).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transaction not found", transaction_errors::err_transaction_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_update_transaction())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transaction.card_number).await;
        let response = to_transaction_response(&transaction);
        envelope.success("transaction status updated", &[]);
        Ok(response)
    }

    pub async fn trashed(&self, id: Uuid) -> Result<TransactionResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "TrashedTransaction", &[("id", &id.to_string())]);

        let transaction = match self.command.trashed(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transaction not found", transaction_errors::err_transaction_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_trashed_transaction())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transaction.card_number).await;
        let response = to_transaction_response_delete_at(&transaction);
        envelope.success("transaction trashed", &[]);
        Ok(response)
    }

    pub async fn restore(&self, id: Uuid) -> Result<TransactionResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreTransaction", &[("id", &id.to_string())]);

        let transaction = match self.command.restore(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transaction not found", transaction_errors::err_transaction_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_restore_transaction())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transaction.card_number).await;
        let response = to_transaction_response_delete_at(&transaction);
        envelope.success("transaction restored", &[]);
        Ok(response)
    }

    pub async fn delete_permanent(&self, id: Uuid) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteTransactionPermanent", &[("id", &id.to_string())]);

        let existing = match self.query.find_by_id(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transaction not found", transaction_errors::err_transaction_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_delete_transaction_permanent())),
        };
        if existing.deleted_at.is_none() {
            return Err(envelope.fail(ErrorKind::NotFound, "transaction is not trashed", transaction_errors::err_transaction_not_trashed()));
        }

        let deleted = match self.command.delete_permanent(id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_delete_transaction_permanent())),
        };
        if !deleted {
            return Err(envelope.fail(ErrorKind::NotFound, "transaction not found", transaction_errors::err_transaction_not_found()));
        }

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&existing.card_number).await;
        envelope.success("transaction permanently deleted", &[]);
        Ok(())
    }

    pub async fn restore_all(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreAllTransaction", &[]);
        if let Err(err) = self.command.restore_all().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_restore_transaction()));
        }
        envelope.success("all trashed transactions restored", &[]);
        Ok(())
    }

    pub async fn delete_all_permanent(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteAllTransactionPermanent", &[]);
        if let Err(err) = self.command.delete_all_permanent().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_failed_delete_transaction_permanent()));
        }
        envelope.success("all trashed transactions purged", &[]);
        Ok(())
    }

    pub async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTransactionAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transaction monthly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transaction monthly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTransactionAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transaction yearly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transaction yearly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTransactionAmountByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transaction monthly amount by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transaction monthly amount by card ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTransactionAmountByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transaction yearly amount by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transaction yearly amount by card ok", &[]);
        Ok(response)
    }

    pub async fn get_total_amount(&self) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalTransactionAmount", &[]);
        match self.stats.get_total_amount().await {
            Ok(total) => {
                envelope.success("transaction total amount ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        }
    }

    pub async fn get_total_amount_by_card_number(&self, card_number: &str) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalTransactionAmountByCardNumber", &[]);
        match self.stats.get_total_amount_by_card_number(card_number).await {
            Ok(total) => {
                envelope.success("transaction total amount by card ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transaction_errors::err_transaction_not_found())),
        }
    }
}
