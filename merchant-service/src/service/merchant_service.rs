//! Merchant service (C6): command, query, and statistics methods, each
//! following the CQRS-lite recipe of spec §4.6. No event is published on
//! create — spec §6.2's topic table names no merchant-owned topic.

use std::sync::Arc;

use shared::cache::{list_fingerprint, year_fingerprint};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::telemetry::MetricsRegistry;
use uuid::Uuid;

use crate::cache::MerchantCache;
use crate::domain::dto::{
    AmountByPeriodResponse, FindAllRequest, FindAllResponse, MerchantResponse, MerchantResponseDeleteAt,
    PaymentMethodAmountResponse,
};
use crate::domain::entities::{NewMerchant, UpdateMerchant};
use crate::domain::mapper::{
    to_amount_by_period_response, to_merchant_response, to_merchant_response_delete_at, to_merchants_response,
    to_payment_method_amount_response,
};
use crate::errors::merchant_errors;
use crate::repository::{MerchantCommandRepository, MerchantQueryRepository, MerchantStatsRepository};

pub struct MerchantService {
    query: Arc<dyn MerchantQueryRepository>,
    command: Arc<dyn MerchantCommandRepository>,
    stats: Arc<dyn MerchantStatsRepository>,
    cache: MerchantCache,
    metrics: Arc<MetricsRegistry>,
}

impl MerchantService {
    pub fn new(
        query: Arc<dyn MerchantQueryRepository>,
        command: Arc<dyn MerchantCommandRepository>,
        stats: Arc<dyn MerchantStatsRepository>,
        cache: MerchantCache,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self { query, command, stats, cache, metrics }
    }

    pub async fn find_all(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindAll", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "all");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("merchant find_all cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_all(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = FindAllResponse { records: to_merchants_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("merchant find_all ok", &[("total", &total.to_string())]);
        Ok(response)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<MerchantResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        if let Some(cached) = self.cache.get_by_id(id).await {
            envelope.success("merchant find_by_id cache hit", &[]);
            return Ok(cached);
        }

        let merchant = match self.query.find_by_id(id).await {
            Ok(Some(m)) => m,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_merchant_response(&merchant);
        self.cache.set_by_id(id, &response).await;
        envelope.success("merchant find_by_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_api_key(&self, api_key: &str) -> Result<MerchantResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByApiKey", &[]);

        if let Some(cached) = self.cache.get_by_api_key(api_key).await {
            envelope.success("merchant find_by_api_key cache hit", &[]);
            return Ok(cached);
        }

        let merchant = match self.query.find_by_api_key(api_key).await {
            Ok(Some(m)) => m,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_merchant_response(&merchant);
        self.cache.set_by_api_key(api_key, &response).await;
        envelope.success("merchant find_by_api_key ok", &[]);
        Ok(response)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<MerchantResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByUserID", &[("user_id", &user_id.to_string())]);

        if let Some(cached) = self.cache.get_by_user(user_id).await {
            envelope.success("merchant find_by_user_id cache hit", &[]);
            return Ok(cached);
        }

        let merchants = match self.query.find_by_user_id(user_id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_merchants_response(&merchants);
        self.cache.set_by_user(user_id, &response).await;
        envelope.success("merchant find_by_user_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_active(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByActive", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "active");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("merchant find_by_active cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_active(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = FindAllResponse { records: to_merchants_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("merchant find_by_active ok", &[]);
        Ok(response)
    }

    pub async fn find_by_trashed(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByTrashed", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "trashed");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("merchant find_by_trashed cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_trashed(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = FindAllResponse { records: to_merchants_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("merchant find_by_trashed ok", &[]);
        Ok(response)
    }

    pub async fn create(&self, new_merchant: NewMerchant) -> Result<MerchantResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "CreateMerchant", &[]);

        let merchant = match self.command.create(new_merchant).await {
            Ok(m) => m,
            Err(err) if is_unique_violation(&err) => {
                return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_already_exists()))
            }
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_create_merchant())),
        };

        self.cache.delete_by_user(merchant.user_id).await;
        let response = to_merchant_response(&merchant);
        envelope.success("merchant created", &[("id", &merchant.id.to_string())]);
        Ok(response)
    }

    pub async fn update(&self, id: Uuid, update: UpdateMerchant) -> Result<MerchantResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Update", &[("id", &id.to_string())]);

        let merchant = match self.command.update(id, update).await {
            Ok(Some(m)) => m,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_update_merchant())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_api_key(&merchant.api_key).await;
        self.cache.delete_by_user(merchant.user_id).await;
        let response = to_merchant_response(&merchant);
        envelope.success("merchant updated", &[]);
        Ok(response)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<MerchantResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "UpdateStatus", &[("id", &id.to_string())]);

        let merchant = match self.command.update_status(id, status).await {
            Ok(Some(m)) => m,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_update_merchant())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_api_key(&merchant.api_key).await;
        let response = to_merchant_response(&merchant);
        envelope.success("merchant status updated", &[]);
        Ok(response)
    }

    pub async fn trashed(&self, id: Uuid) -> Result<MerchantResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "TrashedMerchant", &[("id", &id.to_string())]);

        let merchant = match self.command.trashed(id).await {
            Ok(Some(m)) => m,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_trashed_merchant())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_api_key(&merchant.api_key).await;
        self.cache.delete_by_user(merchant.user_id).await;
        let response = to_merchant_response_delete_at(&merchant);
        envelope.success("merchant trashed", &[]);
        Ok(response)
    }

    pub async fn restore(&self, id: Uuid) -> Result<MerchantResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreMerchant", &[("id", &id.to_string())]);

        let merchant = match self.command.restore(id).await {
            Ok(Some(m)) => m,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_restore_merchant())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_api_key(&merchant.api_key).await;
        self.cache.delete_by_user(merchant.user_id).await;
        let response = to_merchant_response_delete_at(&merchant);
        envelope.success("merchant restored", &[]);
        Ok(response)
    }

    /// Requires the row to already carry `deleted_at` (mirrors card-service's
    /// §9 open-question resolution): `Trashed -> deleted` only.
    pub async fn delete_permanent(&self, id: Uuid) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteMerchantPermanent", &[("id", &id.to_string())]);

        let existing = match self.query.find_by_id(id).await {
            Ok(Some(m)) => m,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_delete_merchant_permanent())),
        };
        if existing.deleted_at.is_none() {
            return Err(envelope.fail(ErrorKind::NotFound, "merchant is not trashed", merchant_errors::err_merchant_not_trashed()));
        }

        let deleted = match self.command.delete_permanent(id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_delete_merchant_permanent())),
        };
        if !deleted {
            return Err(envelope.fail(ErrorKind::NotFound, "merchant not found", merchant_errors::err_merchant_not_found()));
        }

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_api_key(&existing.api_key).await;
        self.cache.delete_by_user(existing.user_id).await;
        envelope.success("merchant permanently deleted", &[]);
        Ok(())
    }

    pub async fn restore_all(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreAllMerchant", &[]);
        if let Err(err) = self.command.restore_all().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_restore_merchant()));
        }
        envelope.success("all trashed merchants restored", &[]);
        Ok(())
    }

    pub async fn delete_all_permanent(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteAllMerchantPermanent", &[]);
        if let Err(err) = self.command.delete_all_permanent().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_failed_delete_merchant_permanent()));
        }
        envelope.success("all trashed merchants purged", &[]);
        Ok(())
    }

    pub async fn get_monthly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_amount_stats(&fingerprint).await {
            envelope.success("merchant monthly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_amount_stats(&fingerprint, &response).await;
        envelope.success("merchant monthly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_amount_stats(&fingerprint).await {
            envelope.success("merchant yearly amount cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_amount_stats(&fingerprint, &response).await;
        envelope.success("merchant yearly amount ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyAmountByMerchant", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount_by_merchant:{}:{}", merchant_id, year_fingerprint(year));

        if let Some(cached) = self.cache.get_amount_stats(&fingerprint).await {
            envelope.success("merchant monthly amount by merchant cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount_by_merchant(merchant_id, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_amount_stats(&fingerprint, &response).await;
        envelope.success("merchant monthly amount by merchant ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyAmountByMerchant", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount_by_merchant:{}:{}", merchant_id, year_fingerprint(year));

        if let Some(cached) = self.cache.get_amount_stats(&fingerprint).await {
            envelope.success("merchant yearly amount by merchant cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount_by_merchant(merchant_id, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_amount_stats(&fingerprint, &response).await;
        envelope.success("merchant yearly amount by merchant ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyAmountByApiKey", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_amount_by_apikey:{}:{}", api_key, year_fingerprint(year));

        if let Some(cached) = self.cache.get_amount_stats(&fingerprint).await {
            envelope.success("merchant monthly amount by apikey cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_amount_by_apikey(api_key, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_amount_stats(&fingerprint, &response).await;
        envelope.success("merchant monthly amount by apikey ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyAmountByApiKey", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_amount_by_apikey:{}:{}", api_key, year_fingerprint(year));

        if let Some(cached) = self.cache.get_amount_stats(&fingerprint).await {
            envelope.success("merchant yearly amount by apikey cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_amount_by_apikey(api_key, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_amount_stats(&fingerprint, &response).await;
        envelope.success("merchant yearly amount by apikey ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_payment_method(&self, year: i32) -> Result<Vec<PaymentMethodAmountResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyPaymentMethod", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_payment_method:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_payment_method_stats(&fingerprint).await {
            envelope.success("merchant monthly payment method cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_payment_method(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_payment_method_amount_response(&rows);
        self.cache.set_payment_method_stats(&fingerprint, &response).await;
        envelope.success("merchant monthly payment method ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_payment_method(&self, year: i32) -> Result<Vec<PaymentMethodAmountResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyPaymentMethod", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_payment_method:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_payment_method_stats(&fingerprint).await {
            envelope.success("merchant yearly payment method cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_payment_method(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_payment_method_amount_response(&rows);
        self.cache.set_payment_method_stats(&fingerprint, &response).await;
        envelope.success("merchant yearly payment method ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_payment_method_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<PaymentMethodAmountResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyPaymentMethodByMerchant", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_payment_method_by_merchant:{}:{}", merchant_id, year_fingerprint(year));

        if let Some(cached) = self.cache.get_payment_method_stats(&fingerprint).await {
            envelope.success("merchant monthly payment method by merchant cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_payment_method_by_merchant(merchant_id, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_payment_method_amount_response(&rows);
        self.cache.set_payment_method_stats(&fingerprint, &response).await;
        envelope.success("merchant monthly payment method by merchant ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_payment_method_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<Vec<PaymentMethodAmountResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyPaymentMethodByMerchant", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_payment_method_by_merchant:{}:{}", merchant_id, year_fingerprint(year));

        if let Some(cached) = self.cache.get_payment_method_stats(&fingerprint).await {
            envelope.success("merchant yearly payment method by merchant cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_payment_method_by_merchant(merchant_id, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_payment_method_amount_response(&rows);
        self.cache.set_payment_method_stats(&fingerprint, &response).await;
        envelope.success("merchant yearly payment method by merchant ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_payment_method_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<PaymentMethodAmountResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyPaymentMethodByApiKey", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_payment_method_by_apikey:{}:{}", api_key, year_fingerprint(year));

        if let Some(cached) = self.cache.get_payment_method_stats(&fingerprint).await {
            envelope.success("merchant monthly payment method by apikey cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_payment_method_by_apikey(api_key, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_payment_method_amount_response(&rows);
        self.cache.set_payment_method_stats(&fingerprint, &response).await;
        envelope.success("merchant monthly payment method by apikey ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_payment_method_by_apikey(&self, api_key: &str, year: i32) -> Result<Vec<PaymentMethodAmountResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyPaymentMethodByApiKey", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_payment_method_by_apikey:{}:{}", api_key, year_fingerprint(year));

        if let Some(cached) = self.cache.get_payment_method_stats(&fingerprint).await {
            envelope.success("merchant yearly payment method by apikey cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_payment_method_by_apikey(api_key, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        let response = to_payment_method_amount_response(&rows);
        self.cache.set_payment_method_stats(&fingerprint, &response).await;
        envelope.success("merchant yearly payment method by apikey ok", &[]);
        Ok(response)
    }

    /// Part of the dashboard family named in spec §6.1 for merchant-service.
    pub async fn get_total_amount(&self, year: i32) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalAmount", &[("year", &year.to_string())]);
        let fingerprint = format!("total_amount:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_total_stats(&fingerprint).await {
            envelope.success("merchant total amount cache hit", &[]);
            return Ok(cached);
        }
        let total = match self.stats.get_total_amount(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        self.cache.set_total_stats(&fingerprint, total).await;
        envelope.success("merchant total amount ok", &[]);
        Ok(total)
    }

    pub async fn get_total_amount_by_merchant(&self, merchant_id: Uuid, year: i32) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalAmountByMerchant", &[("year", &year.to_string())]);
        let fingerprint = format!("total_amount_by_merchant:{}:{}", merchant_id, year_fingerprint(year));

        if let Some(cached) = self.cache.get_total_stats(&fingerprint).await {
            envelope.success("merchant total amount by merchant cache hit", &[]);
            return Ok(cached);
        }
        let total = match self.stats.get_total_amount_by_merchant(merchant_id, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        self.cache.set_total_stats(&fingerprint, total).await;
        envelope.success("merchant total amount by merchant ok", &[]);
        Ok(total)
    }

    pub async fn get_total_amount_by_apikey(&self, api_key: &str, year: i32) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalAmountByApiKey", &[("year", &year.to_string())]);
        let fingerprint = format!("total_amount_by_apikey:{}:{}", api_key, year_fingerprint(year));

        if let Some(cached) = self.cache.get_total_stats(&fingerprint).await {
            envelope.success("merchant total amount by apikey cache hit", &[]);
            return Ok(cached);
        }
        let total = match self.stats.get_total_amount_by_apikey(api_key, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), merchant_errors::err_merchant_not_found())),
        };
        self.cache.set_total_stats(&fingerprint, total).await;
        envelope.success("merchant total amount by apikey ok", &[]);
        Ok(total)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
