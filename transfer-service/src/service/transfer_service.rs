//! Transfer service (C6): command, query, and statistics methods, each
//! following the CQRS-lite recipe of spec §4.6 exactly. Transfer is the one
//! entity with a sender/receiver split, so its statistics methods come in
//! sender and receiver variants (spec §4.4: `TransferAmount[Sender|Receiver]`).

use std::sync::Arc;
use uuid::Uuid;

use shared::cache::{card_year_fingerprint, list_fingerprint, year_fingerprint};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::telemetry::MetricsRegistry;

use crate::cache::TransferCache;
use crate::domain::dto::{AmountByPeriodResponse, FindAllRequest, FindAllResponse, TransferResponse, TransferResponseDeleteAt};
use crate::domain::entities::{NewTransfer, UpdateTransfer};
use crate::domain::mapper::{to_amount_by_period_response, to_transfer_response, to_transfer_response_delete_at, to_transfers_response};
use crate::errors::transfer_errors;
use crate::repository::{TransferCommandRepository, TransferQueryRepository, TransferStatsRepository};

pub struct TransferService {
    query: Arc<dyn TransferQueryRepository>,
    command: Arc<dyn TransferCommandRepository>,
    stats: Arc<dyn TransferStatsRepository>,
    cache: TransferCache,
    metrics: Arc<MetricsRegistry>,
}

impl TransferService {
    pub fn new(
        query: Arc<dyn TransferQueryRepository>,
        command: Arc<dyn TransferCommandRepository>,
        stats: Arc<dyn TransferStatsRepository>,
        cache: TransferCache,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self { query, command, stats, cache, metrics }
    }

    pub async fn find_all(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindAll", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "all");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("transfer find_all cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_all(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = FindAllResponse { records: to_transfers_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("transfer find_all ok", &[("total", &total.to_string())]);
        Ok(response)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<TransferResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        if let Some(cached) = self.cache.get_by_id(id).await {
            envelope.success("transfer find_by_id cache hit", &[]);
            return Ok(cached);
        }

        let transfer = match self.query.find_by_id(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transfer not found", transfer_errors::err_transfer_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_transfer_response(&transfer);
        self.cache.set_by_id(id, &response).await;
        envelope.success("transfer find_by_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_card_number(&self, card_number: &str) -> Result<Vec<TransferResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByCardNumber", &[]);

        if let Some(cached) = self.cache.get_by_card_number(card_number).await {
            envelope.success("transfer find_by_card_number cache hit", &[]);
            return Ok(cached);
        }

        let transfers = match self.query.find_by_card_number(card_number).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_transfers_response(&transfers);
        self.cache.set_by_card_number(card_number, &response).await;
        envelope.success("transfer find_by_card_number ok", &[]);
        Ok(response)
    }

    pub async fn find_by_active(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByActive", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "active");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("transfer find_by_active cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_active(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = FindAllResponse { records: to_transfers_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("transfer find_by_active ok", &[]);
        Ok(response)
    }

    pub async fn find_by_trashed(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByTrashed", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "trashed");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("transfer find_by_trashed cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_trashed(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = FindAllResponse { records: to_transfers_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("transfer find_by_trashed ok", &[]);
        Ok(response)
    }

    pub async fn create(&self, new_transfer: NewTransfer) -> Result<TransferResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "CreateTransfer", &[]);

        let transfer = match self.command.create(new_transfer).await {
            Ok(t) => t,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_create_transfer())),
        };

        self.cache.delete_by_card_number(&transfer.transfer_from).await;
        self.cache.delete_by_card_number(&transfer.transfer_to).await;
        let response = to_transfer_response(&transfer);
        envelope.success("transfer created", &[("id", &transfer.id.to_string())]);
        Ok(response)
    }

    pub async fn update(&self, id: Uuid, update: UpdateTransfer) -> Result<TransferResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Update", &[("id", &id.to_string())]);

        let transfer = match self.command.update(id, update).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transfer not found", transfer_errors::err_transfer_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_update_transfer())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transfer.transfer_from).await;
        self.cache.delete_by_card_number(&transfer.transfer_to).await;
        let response = to_transfer_response(&transfer);
        envelope.success("transfer updated", &[]);
        Ok(response)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<TransferResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "UpdateStatus", &[("id", &id.to_string())]);

        let transfer = match self.command.update_status(id, status).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transfer not found", transfer_errors::err_transfer_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_update_transfer())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transfer.transfer_from).await;
        self.cache.delete_by_card_number(&transfer.transfer_to).await;
        let response = to_transfer_response(&transfer);
        envelope.success("transfer status updated", &[]);
        Ok(response)
    }

    pub async fn trashed(&self, id: Uuid) -> Result<TransferResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "TrashedTransfer", &[("id", &id.to_string())]);

        let transfer = match self.command.trashed(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transfer not found", transfer_errors::err_transfer_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_trashed_transfer())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transfer.transfer_from).await;
        self.cache.delete_by_card_number(&transfer.transfer_to).await;
        let response = to_transfer_response_delete_at(&transfer);
        envelope.success("transfer trashed", &[]);
        Ok(response)
    }

    pub async fn restore(&self, id: Uuid) -> Result<TransferResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreTransfer", &[("id", &id.to_string())]);

        let transfer = match self.command.restore(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transfer not found", transfer_errors::err_transfer_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_restore_transfer())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&transfer.transfer_from).await;
        self.cache.delete_by_card_number(&transfer.transfer_to).await;
        let response = to_transfer_response_delete_at(&transfer);
        envelope.success("transfer restored", &[]);
        Ok(response)
    }

    pub async fn delete_permanent(&self, id: Uuid) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteTransferPermanent", &[("id", &id.to_string())]);

        let existing = match self.query.find_by_id(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "transfer not found", transfer_errors::err_transfer_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_delete_transfer_permanent())),
        };
        if existing.deleted_at.is_none() {
            return Err(envelope.fail(ErrorKind::NotFound, "transfer is not trashed", transfer_errors::err_transfer_not_trashed()));
        }

        let deleted = match self.command.delete_permanent(id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_delete_transfer_permanent())),
        };
        if !deleted {
            return Err(envelope.fail(ErrorKind::NotFound, "transfer not found", transfer_errors::err_transfer_not_found()));
        }

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&existing.transfer_from).await;
        self.cache.delete_by_card_number(&existing.transfer_to).await;
        envelope.success("transfer permanently deleted", &[]);
        Ok(())
    }

    pub async fn restore_all(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreAllTransfer", &[]);
        if let Err(err) = self.command.restore_all().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_restore_transfer()));
        }
        envelope.success("all trashed transfers restored", &[]);
        Ok(())
    }

    pub async fn delete_all_permanent(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteAllTransferPermanent", &[]);
        if let Err(err) = self.command.delete_all_permanent().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_failed_delete_transfer_permanent()));
        }
        envelope.success("all trashed transfers purged", &[]);
        Ok(())
    }

    pub async fn get_monthly_amount_sender(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTransferAmountSender", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_sender:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transfer monthly sender amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount_sender(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transfer monthly sender amount ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount_sender(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTransferAmountSender", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_sender:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transfer yearly sender amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount_sender(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transfer yearly sender amount ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_amount_receiver(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTransferAmountReceiver", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_receiver:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transfer monthly receiver amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount_receiver(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transfer monthly receiver amount ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount_receiver(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTransferAmountReceiver", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_receiver:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transfer yearly receiver amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount_receiver(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transfer yearly receiver amount ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTransferAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transfer monthly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transfer monthly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTransferAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("transfer yearly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("transfer yearly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_total_amount(&self) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalTransferAmount", &[]);
        match self.stats.get_total_amount().await {
            Ok(total) => {
                envelope.success("transfer total amount ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        }
    }

    pub async fn get_total_amount_sender(&self, card_number: &str) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalTransferAmountSender", &[]);
        match self.stats.get_total_amount_sender(card_number).await {
            Ok(total) => {
                envelope.success("transfer total sender amount ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        }
    }

    pub async fn get_total_amount_receiver(&self, card_number: &str) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalTransferAmountReceiver", &[]);
        match self.stats.get_total_amount_receiver(card_number).await {
            Ok(total) => {
                envelope.success("transfer total receiver amount ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), transfer_errors::err_transfer_not_found())),
        }
    }
}
