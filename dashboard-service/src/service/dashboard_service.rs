//! Dashboard aggregator (C8): fans out across the per-entity statistics
//! totals and composes a single cache-backed response, following the
//! CQRS-lite recipe of spec §4.6 (cache lookup -> repository call(s) ->
//! map -> cache write).
//!
//! Per spec §4.8, a failure in any one leg is translated via that leg's
//! own catalogue entry and surfaced immediately — partial results are
//! never returned. `tokio::try_join!` gives us exactly that: the first
//! error short-circuits the rest.

use std::sync::Arc;

use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::telemetry::MetricsRegistry;

use crate::cache::DashboardCache;
use crate::domain::dto::{DashboardByCardResponse, DashboardResponse};
use crate::errors::dashboard_errors;
use crate::repository::DashboardRepository;

pub struct DashboardService {
    repository: Arc<dyn DashboardRepository>,
    cache: DashboardCache,
    metrics: Arc<MetricsRegistry>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn DashboardRepository>, cache: DashboardCache, metrics: Arc<MetricsRegistry>) -> Self {
        Self { repository, cache, metrics }
    }

    pub async fn get_dashboard(&self) -> Result<DashboardResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetDashboard", &[]);

        if let Some(cached) = self.cache.get().await {
            envelope.success("dashboard cache hit", &[]);
            return Ok(cached);
        }

        let totals = tokio::try_join!(
            self.repository.get_total_balance(),
            self.repository.get_total_topup_amount(),
            self.repository.get_total_withdraw_amount(),
            self.repository.get_total_transaction_amount(),
            self.repository.get_total_transfer_amount(),
        );

        let (total_balance, total_topup_amount, total_withdraw_amount, total_transaction_amount, total_transfer_amount) = match totals {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), dashboard_errors::err_failed_total_balance())),
        };

        let response = DashboardResponse {
            total_balance,
            total_topup_amount,
            total_withdraw_amount,
            total_transaction_amount,
            total_transfer_amount,
        };
        self.cache.set(&response).await;
        envelope.success("dashboard ok", &[]);
        Ok(response)
    }

    pub async fn get_dashboard_by_card_number(&self, card_number: &str) -> Result<DashboardByCardResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetDashboardByCardNumber", &[]);

        if let Some(cached) = self.cache.get_by_card_number(card_number).await {
            envelope.success("dashboard by card cache hit", &[]);
            return Ok(cached);
        }

        let totals = tokio::try_join!(
            self.repository.get_total_balance_by_card_number(card_number),
            self.repository.get_total_topup_amount_by_card_number(card_number),
            self.repository.get_total_withdraw_amount_by_card_number(card_number),
            self.repository.get_total_transaction_amount_by_card_number(card_number),
            self.repository.get_total_transfer_amount_sender_by_card_number(card_number),
            self.repository.get_total_transfer_amount_receiver_by_card_number(card_number),
        );

        let (total_balance, total_topup_amount, total_withdraw_amount, total_transaction_amount, total_transfer_amount_sent, total_transfer_amount_received) =
            match totals {
                Ok(v) => v,
                Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), dashboard_errors::err_failed_total_balance())),
            };

        let response = DashboardByCardResponse {
            card_number: card_number.to_string(),
            total_balance,
            total_topup_amount,
            total_withdraw_amount,
            total_transaction_amount,
            total_transfer_amount_sent,
            total_transfer_amount_received,
        };
        self.cache.set_by_card_number(card_number, &response).await;
        envelope.success("dashboard by card ok", &[]);
        Ok(response)
    }
}
