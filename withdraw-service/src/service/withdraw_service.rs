//! Withdraw service (C6): command, query, and statistics methods, each
//! following the CQRS-lite recipe of spec §4.6 exactly.

use std::sync::Arc;
use uuid::Uuid;

use shared::cache::{card_year_fingerprint, list_fingerprint, year_fingerprint};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::telemetry::MetricsRegistry;

use crate::cache::WithdrawCache;
use crate::domain::dto::{AmountByPeriodResponse, FindAllRequest, FindAllResponse, WithdrawResponse, WithdrawResponseDeleteAt};
use crate::domain::entities::{NewWithdraw, UpdateWithdraw};
use crate::domain::mapper::{to_amount_by_period_response, to_withdraw_response, to_withdraw_response_delete_at, to_withdraws_response};
use crate::errors::withdraw_errors;
use crate::repository::{WithdrawCommandRepository, WithdrawQueryRepository, WithdrawStatsRepository};

pub struct WithdrawService {
    query: Arc<dyn WithdrawQueryRepository>,
    command: Arc<dyn WithdrawCommandRepository>,
    stats: Arc<dyn WithdrawStatsRepository>,
    cache: WithdrawCache,
    metrics: Arc<MetricsRegistry>,
}

impl WithdrawService {
    pub fn new(
        query: Arc<dyn WithdrawQueryRepository>,
        command: Arc<dyn WithdrawCommandRepository>,
        stats: Arc<dyn WithdrawStatsRepository>,
        cache: WithdrawCache,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self { query, command, stats, cache, metrics }
    }

    pub async fn find_all(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindAll", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "all");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("withdraw find_all cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_all(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = FindAllResponse { records: to_withdraws_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("withdraw find_all ok", &[("total", &total.to_string())]);
        Ok(response)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<WithdrawResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        if let Some(cached) = self.cache.get_by_id(id).await {
            envelope.success("withdraw find_by_id cache hit", &[]);
            return Ok(cached);
        }

        let withdraw = match self.query.find_by_id(id).await {
            Ok(Some(w)) => w,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "withdraw not found", withdraw_errors::err_withdraw_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = to_withdraw_response(&withdraw);
        self.cache.set_by_id(id, &response).await;
        envelope.success("withdraw find_by_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_card_number(&self, card_number: &str) -> Result<Vec<WithdrawResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByCardNumber", &[]);

        if let Some(cached) = self.cache.get_by_card_number(card_number).await {
            envelope.success("withdraw find_by_card_number cache hit", &[]);
            return Ok(cached);
        }

        let withdraws = match self.query.find_by_card_number(card_number).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = to_withdraws_response(&withdraws);
        self.cache.set_by_card_number(card_number, &response).await;
        envelope.success("withdraw find_by_card_number ok", &[]);
        Ok(response)
    }

    pub async fn find_by_active(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByActive", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "active");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("withdraw find_by_active cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_active(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = FindAllResponse { records: to_withdraws_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("withdraw find_by_active ok", &[]);
        Ok(response)
    }

    pub async fn find_by_trashed(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByTrashed", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "trashed");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("withdraw find_by_trashed cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_trashed(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = FindAllResponse { records: to_withdraws_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("withdraw find_by_trashed ok", &[]);
        Ok(response)
    }

    pub async fn create(&self, new_withdraw: NewWithdraw) -> Result<WithdrawResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "CreateWithdraw", &[]);

        let withdraw = match self.command.create(new_withdraw).await {
            Ok(w) => w,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_create_withdraw())),
        };

        self.cache.delete_by_card_number(&withdraw.card_number).await;
        let response = to_withdraw_response(&withdraw);
        envelope.success("withdraw created", &[("id", &withdraw.id.to_string())]);
        Ok(response)
    }

    pub async fn update(&self, id: Uuid, update: UpdateWithdraw) -> Result<WithdrawResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Update", &[("id", &id.to_string())]);

        let withdraw = match self.command.update(id, update).await {
            Ok(Some(w)) => w,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "withdraw not found", withdraw_errors::err_withdraw_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_update_withdraw())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&withdraw.card_number).await;
        let response = to_withdraw_response(&withdraw);
        envelope.success("withdraw updated", &[]);
        Ok(response)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<WithdrawResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "UpdateStatus", &[("id", &id.to_string())]);

        let withdraw = match self.command.update_status(id, status).await {
            Ok(Some(w)) => w,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "withdraw not found", withdraw_errors::err_withdraw_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_update_withdraw())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&withdraw.card_number).await;
        let response = to_withdraw_response(&withdraw);
        envelope.success("withdraw status updated", &[]);
        Ok(response)
    }

    pub async fn trashed(&self, id: Uuid) -> Result<WithdrawResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "TrashedWithdraw", &[("id", &id.to_string())]);

        let withdraw = match self.command.trashed(id).await {
            Ok(Some(w)) => w,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "withdraw not found", withdraw_errors::err_withdraw_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_trashed_withdraw())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&withdraw.card_number).await;
        let response = to_withdraw_response_delete_at(&withdraw);
        envelope.success("withdraw trashed", &[]);
        Ok(response)
    }

    pub async fn restore(&self, id: Uuid) -> Result<WithdrawResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreWithdraw", &[("id", &id.to_string())]);

        let withdraw = match self.command.restore(id).await {
            Ok(Some(w)) => w,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "withdraw not found", withdraw_errors::err_withdraw_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_restore_withdraw())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&withdraw.card_number).await;
        let response = to_withdraw_response_delete_at(&withdraw);
        envelope.success("withdraw restored", &[]);
        Ok(response)
    }

    pub async fn delete_permanent(&self, id: Uuid) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteWithdrawPermanent", &[("id", &id.to_string())]);

        let existing = match self.query.find_by_id(id).await {
            Ok(Some(w)) => w,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "withdraw not found", withdraw_errors::err_withdraw_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_delete_withdraw_permanent())),
        };
        if existing.deleted_at.is_none() {
            return Err(envelope.fail(ErrorKind::NotFound, "withdraw is not trashed", withdraw_errors::err_withdraw_not_trashed()));
        }

        let deleted = match self.command.delete_permanent(id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_delete_withdraw_permanent())),
        };
        if !deleted {
            return Err(envelope.fail(ErrorKind::NotFound, "withdraw not found", withdraw_errors::err_withdraw_not_found()));
        }

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&existing.card_number).await;
        envelope.success("withdraw permanently deleted", &[]);
        Ok(())
    }

    pub async fn restore_all(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreAllWithdraw", &[]);
        if let Err(err) = self.command.restore_all().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_restore_withdraw()));
        }
        envelope.success("all trashed withdraws restored", &[]);
        Ok(())
    }

    pub async fn delete_all_permanent(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteAllWithdrawPermanent", &[]);
        if let Err(err) = self.command.delete_all_permanent().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_failed_delete_withdraw_permanent()));
        }
        envelope.success("all trashed withdraws purged", &[]);
        Ok(())
    }

    pub async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyWithdrawAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("withdraw monthly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("withdraw monthly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyWithdrawAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("withdraw yearly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("withdraw yearly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyWithdrawAmountByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("withdraw monthly amount by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("withdraw monthly amount by card ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyWithdrawAmountByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("withdraw yearly amount by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("withdraw yearly amount by card ok", &[]);
        Ok(response)
    }

    pub async fn get_total_amount(&self) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalWithdrawAmount", &[]);
        match self.stats.get_total_amount().await {
            Ok(total) => {
                envelope.success("withdraw total amount ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        }
    }

    pub async fn get_total_amount_by_card_number(&self, card_number: &str) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalWithdrawAmountByCardNumber", &[]);
        match self.stats.get_total_amount_by_card_number(card_number).await {
            Ok(total) => {
                envelope.success("withdraw total amount by card ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), withdraw_errors::err_withdraw_not_found())),
        }
    }
}
