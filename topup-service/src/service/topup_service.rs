//! Topup service (C6): command, query, and statistics methods, each
//! following the CQRS-lite recipe of spec §4.6 exactly.

use std::sync::Arc;
use uuid::Uuid;

use shared::cache::{card_year_fingerprint, list_fingerprint, year_fingerprint};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::telemetry::MetricsRegistry;

use crate::cache::TopupCache;
use crate::domain::dto::{
    AmountByMethodResponse, AmountByPeriodResponse, FindAllRequest, FindAllResponse, TopupResponse, TopupResponseDeleteAt,
};
use crate::domain::entities::{NewTopup, UpdateTopup};
use crate::domain::mapper::{to_amount_by_method_response, to_amount_by_period_response, to_topup_response, to_topup_response_delete_at, to_topups_response};
use crate::errors::topup_errors;
use crate::repository::{TopupCommandRepository, TopupQueryRepository, TopupStatsRepository};

pub struct TopupService {
    query: Arc<dyn TopupQueryRepository>,
    command: Arc<dyn TopupCommandRepository>,
    stats: Arc<dyn TopupStatsRepository>,
    cache: TopupCache,
    metrics: Arc<MetricsRegistry>,
}

impl TopupService {
    pub fn new(
        query: Arc<dyn TopupQueryRepository>,
        command: Arc<dyn TopupCommandRepository>,
        stats: Arc<dyn TopupStatsRepository>,
        cache: TopupCache,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self { query, command, stats, cache, metrics }
    }

    pub async fn find_all(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindAll", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "all");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("topup find_all cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_all(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = FindAllResponse { records: to_topups_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("topup find_all ok", &[("total", &total.to_string())]);
        Ok(response)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<TopupResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        if let Some(cached) = self.cache.get_by_id(id).await {
            envelope.success("topup find_by_id cache hit", &[]);
            return Ok(cached);
        }

        let topup = match self.query.find_by_id(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "topup not found", topup_errors::err_topup_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_topup_response(&topup);
        self.cache.set_by_id(id, &response).await;
        envelope.success("topup find_by_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_card_number(&self, card_number: &str) -> Result<Vec<TopupResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByCardNumber", &[]);

        if let Some(cached) = self.cache.get_by_card_number(card_number).await {
            envelope.success("topup find_by_card_number cache hit", &[]);
            return Ok(cached);
        }

        let topups = match self.query.find_by_card_number(card_number).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_topups_response(&topups);
        self.cache.set_by_card_number(card_number, &response).await;
        envelope.success("topup find_by_card_number ok", &[]);
        Ok(response)
    }

    pub async fn find_by_active(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByActive", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "active");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("topup find_by_active cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_active(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = FindAllResponse { records: to_topups_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("topup find_by_active ok", &[]);
        Ok(response)
    }

    pub async fn find_by_trashed(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByTrashed", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "trashed");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("topup find_by_trashed cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_trashed(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = FindAllResponse { records: to_topups_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("topup find_by_trashed ok", &[]);
        Ok(response)
    }

    pub async fn create(&self, new_topup: NewTopup) -> Result<TopupResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "CreateTopup", &[]);

        let topup = match self.command.create(new_topup).await {
            Ok(t) => t,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_create_topup())),
        };

        self.cache.delete_by_card_number(&topup.card_number).await;
        let response = to_topup_response(&topup);
        envelope.success("topup created", &[("id", &topup.id.to_string())]);
        Ok(response)
    }

    pub async fn update(&self, id: Uuid, update: UpdateTopup) -> Result<TopupResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Update", &[("id", &id.to_string())]);

        let topup = match self.command.update(id, update).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "topup not found", topup_errors::err_topup_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_update_topup())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&topup.card_number).await;
        let response = to_topup_response(&topup);
        envelope.success("topup updated", &[]);
        Ok(response)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<TopupResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "UpdateStatus", &[("id", &id.to_string())]);

        let topup = match self.command.update_status(id, status).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "topup not found", topup_errors::err_topup_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_update_topup())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&topup.card_number).await;
        let response = to_topup_response(&topup);
        envelope.success("topup status updated", &[]);
        Ok(response)
    }

    pub async fn trashed(&self, id: Uuid) -> Result<TopupResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "TrashedTopup", &[("id", &id.to_string())]);

        let topup = match self.command.trashed(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "topup not found", topup_errors::err_topup_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_trashed_topup())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&topup.card_number).await;
        let response = to_topup_response_delete_at(&topup);
        envelope.success("topup trashed", &[]);
        Ok(response)
    }

    pub async fn restore(&self, id: Uuid) -> Result<TopupResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreTopup", &[("id", &id.to_string())]);

        let topup = match self.command.restore(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "topup not found", topup_errors::err_topup_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_restore_topup())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&topup.card_number).await;
        let response = to_topup_response_delete_at(&topup);
        envelope.success("topup restored", &[]);
        Ok(response)
    }

    pub async fn delete_permanent(&self, id: Uuid) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteTopupPermanent", &[("id", &id.to_string())]);

        let existing = match self.query.find_by_id(id).await {
            Ok(Some(t)) => t,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "topup not found", topup_errors::err_topup_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_delete_topup_permanent())),
        };
        if existing.deleted_at.is_none() {
            return Err(envelope.fail(ErrorKind::NotFound, "topup is not trashed", topup_errors::err_topup_not_trashed()));
        }

        let deleted = match self.command.delete_permanent(id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_delete_topup_permanent())),
        };
        if !deleted {
            return Err(envelope.fail(ErrorKind::NotFound, "topup not found", topup_errors::err_topup_not_found()));
        }

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&existing.card_number).await;
        envelope.success("topup permanently deleted", &[]);
        Ok(())
    }

    pub async fn restore_all(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreAllTopup", &[]);
        if let Err(err) = self.command.restore_all().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_restore_topup()));
        }
        envelope.success("all trashed topups restored", &[]);
        Ok(())
    }

    pub async fn delete_all_permanent(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteAllTopupPermanent", &[]);
        if let Err(err) = self.command.delete_all_permanent().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_failed_delete_topup_permanent()));
        }
        envelope.success("all trashed topups purged", &[]);
        Ok(())
    }

    pub async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTopupAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("topup monthly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("topup monthly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTopupAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("topup yearly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("topup yearly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTopupAmountByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("topup monthly amount by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("topup monthly amount by card ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTopupAmountByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("topup yearly amount by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("topup yearly amount by card ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_method(&self, year: i32) -> Result<Vec<AmountByMethodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyTopupMethod", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_method:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_method_stats(&fingerprint).await {
            envelope.success("topup monthly method cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_method(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_amount_by_method_response(&rows);
        self.cache.set_method_stats(&fingerprint, &response).await;
        envelope.success("topup monthly method ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_method(&self, year: i32) -> Result<Vec<AmountByMethodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyTopupMethod", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_method:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_method_stats(&fingerprint).await {
            envelope.success("topup yearly method cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_method(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        };
        let response = to_amount_by_method_response(&rows);
        self.cache.set_method_stats(&fingerprint, &response).await;
        envelope.success("topup yearly method ok", &[]);
        Ok(response)
    }

    pub async fn get_total_amount(&self) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalTopupAmount", &[]);
        match self.stats.get_total_amount().await {
            Ok(total) => {
                envelope.success("topup total amount ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        }
    }

    pub async fn get_total_amount_by_card_number(&self, card_number: &str) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalTopupAmountByCardNumber", &[]);
        match self.stats.get_total_amount_by_card_number(card_number).await {
            Ok(total) => {
                envelope.success("topup total amount by card ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), topup_errors::err_topup_not_found())),
        }
    }
}
