//! Card service (C6): command, query, and statistics methods, each
//! following the CQRS-lite recipe of spec §4.6 exactly.

use std::sync::Arc;

use shared::cache::{card_year_fingerprint, list_fingerprint, year_fingerprint};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse};
use shared::events::Publisher;
use shared::telemetry::MetricsRegistry;
use uuid::Uuid;

use crate::cache::CardCache;
use crate::domain::dto::{
    AmountByPeriodResponse, CardResponse, CardResponseDeleteAt, FindAllRequest, FindAllResponse,
};
use crate::domain::entities::{NewCard, UpdateCard};
use crate::domain::events::{publish_key, saldo_created_payload, TOPIC_CREATE_SALDO};
use crate::domain::mapper::{to_amount_by_period_response, to_card_response, to_card_response_delete_at, to_cards_response};
use crate::errors::card_errors;
use crate::repository::{CardCommandRepository, CardQueryRepository, CardStatsRepository};

pub struct CardService {
    query: Arc<dyn CardQueryRepository>,
    command: Arc<dyn CardCommandRepository>,
    stats: Arc<dyn CardStatsRepository>,
    cache: CardCache,
    publisher: Arc<dyn Publisher>,
    metrics: Arc<MetricsRegistry>,
}

impl CardService {
    pub fn new(
        query: Arc<dyn CardQueryRepository>,
        command: Arc<dyn CardCommandRepository>,
        stats: Arc<dyn CardStatsRepository>,
        cache: CardCache,
        publisher: Arc<dyn Publisher>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self { query, command, stats, cache, publisher, metrics }
    }

    pub async fn find_all(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindAll", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "all");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("card find_all cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_all(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = FindAllResponse { records: to_cards_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("card find_all ok", &[("total", &total.to_string())]);
        Ok(response)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<CardResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        if let Some(cached) = self.cache.get_by_id(id).await {
            envelope.success("card find_by_id cache hit", &[]);
            return Ok(cached);
        }

        let card = match self.query.find_by_id(id).await {
            Ok(Some(c)) => c,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = to_card_response(&card);
        self.cache.set_by_id(id, &response).await;
        envelope.success("card find_by_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<CardResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByUserID", &[("user_id", &user_id.to_string())]);

        if let Some(cached) = self.cache.get_by_user(user_id).await {
            envelope.success("card find_by_user_id cache hit", &[]);
            return Ok(cached);
        }

        let cards = match self.query.find_by_user_id(user_id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = to_cards_response(&cards);
        self.cache.set_by_user(user_id, &response).await;
        envelope.success("card find_by_user_id ok", &[]);
        Ok(response)
    }

    pub async fn find_by_card_number(&self, card_number: &str) -> Result<CardResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByCardNumber", &[]);

        if let Some(cached) = self.cache.get_by_card_number(card_number).await {
            envelope.success("card find_by_card_number cache hit", &[]);
            return Ok(cached);
        }

        let card = match self.query.find_by_card_number(card_number).await {
            Ok(Some(c)) => c,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = to_card_response(&card);
        self.cache.set_by_card_number(card_number, &response).await;
        envelope.success("card find_by_card_number ok", &[]);
        Ok(response)
    }

    pub async fn find_by_active(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByActive", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "active");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("card find_by_active cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_active(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = FindAllResponse { records: to_cards_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("card find_by_active ok", &[]);
        Ok(response)
    }

    pub async fn find_by_trashed(&self, req: &FindAllRequest) -> Result<FindAllResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindByTrashed", &[]);
        let (page, page_size, search) = req.clamped();
        let fingerprint = list_fingerprint(page, page_size, &search, "trashed");

        if let Some(cached) = self.cache.get_list(&fingerprint).await {
            envelope.success("card find_by_trashed cache hit", &[]);
            return Ok(cached);
        }

        let (records, total) = match self.query.find_by_trashed(page, page_size, &search).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = FindAllResponse { records: to_cards_response(&records), total };
        self.cache.set_list(&fingerprint, &response).await;
        envelope.success("card find_by_trashed ok", &[]);
        Ok(response)
    }

    /// Create, then publish `{card_number, total_balance:0}` to
    /// `saldo-service-topic-create-saldo` keyed by the new card's id
    /// (spec §4.7/§6.2), then invalidate the listing caches.
    pub async fn create(&self, new_card: NewCard) -> Result<CardResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "CreateCard", &[]);

        let card = match self.command.create(new_card).await {
            Ok(c) => c,
            Err(err) if is_unique_violation(&err) => {
                return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_already_exists()))
            }
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_create_card())),
        };

        let payload = saldo_created_payload(&card.card_number);
        let payload_json = match serde_json::to_value(&payload) {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::JsonMarshal, &err.to_string(), card_errors::err_failed_create_card())),
        };
        if let Err(err) = self.publisher.publish(TOPIC_CREATE_SALDO, &publish_key(card.id), &payload_json).await {
            return Err(envelope.fail(ErrorKind::Publisher, &err, card_errors::err_failed_create_card()));
        }

        self.cache.delete_by_user(card.user_id).await;
        let response = to_card_response(&card);
        envelope.success("card created", &[("id", &card.id.to_string())]);
        Ok(response)
    }

    pub async fn update(&self, id: Uuid, update: UpdateCard) -> Result<CardResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Update", &[("id", &id.to_string())]);

        let card = match self.command.update(id, update).await {
            Ok(Some(c)) => c,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_update_card())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&card.card_number).await;
        self.cache.delete_by_user(card.user_id).await;
        let response = to_card_response(&card);
        envelope.success("card updated", &[]);
        Ok(response)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<CardResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "UpdateStatus", &[("id", &id.to_string())]);

        let card = match self.command.update_status(id, status).await {
            Ok(Some(c)) => c,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_update_card())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&card.card_number).await;
        let response = to_card_response(&card);
        envelope.success("card status updated", &[]);
        Ok(response)
    }

    pub async fn trashed(&self, id: Uuid) -> Result<CardResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "TrashedCard", &[("id", &id.to_string())]);

        let card = match self.command.trashed(id).await {
            Ok(Some(c)) => c,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_trashed_card())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&card.card_number).await;
        self.cache.delete_by_user(card.user_id).await;
        let response = to_card_response_delete_at(&card);
        envelope.success("card trashed", &[]);
        Ok(response)
    }

    pub async fn restore(&self, id: Uuid) -> Result<CardResponseDeleteAt, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreCard", &[("id", &id.to_string())]);

        let card = match self.command.restore(id).await {
            Ok(Some(c)) => c,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_restore_card())),
        };

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&card.card_number).await;
        self.cache.delete_by_user(card.user_id).await;
        let response = to_card_response_delete_at(&card);
        envelope.success("card restored", &[]);
        Ok(response)
    }

    /// Requires the row to already carry `deleted_at` (see DESIGN.md's open-
    /// question resolution): `Trashed -> deleted` only.
    pub async fn delete_permanent(&self, id: Uuid) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteCardPermanent", &[("id", &id.to_string())]);

        let existing = match self.query.find_by_id(id).await {
            Ok(Some(c)) => c,
            Ok(None) => return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found())),
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_delete_card_permanent())),
        };
        if existing.deleted_at.is_none() {
            return Err(envelope.fail(ErrorKind::NotFound, "card is not trashed", card_errors::err_card_not_trashed()));
        }

        let deleted = match self.command.delete_permanent(id).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_delete_card_permanent())),
        };
        if !deleted {
            return Err(envelope.fail(ErrorKind::NotFound, "card not found", card_errors::err_card_not_found()));
        }

        self.cache.delete_by_id(id).await;
        self.cache.delete_by_card_number(&existing.card_number).await;
        self.cache.delete_by_user(existing.user_id).await;
        envelope.success("card permanently deleted", &[]);
        Ok(())
    }

    pub async fn restore_all(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RestoreAllCard", &[]);
        if let Err(err) = self.command.restore_all().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_restore_card()));
        }
        envelope.success("all trashed cards restored", &[]);
        Ok(())
    }

    pub async fn delete_all_permanent(&self) -> Result<(), ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "DeleteAllCardPermanent", &[]);
        if let Err(err) = self.command.delete_all_permanent().await {
            return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_failed_delete_card_permanent()));
        }
        envelope.success("all trashed cards purged", &[]);
        Ok(())
    }

    pub async fn get_monthly_balance(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyBalance", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_balance:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("card monthly balance cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_balance(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("card monthly balance ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_balance(&self, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyBalance", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_balance:{}", year_fingerprint(year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("card yearly balance cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_balance(year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("card yearly balance ok", &[]);
        Ok(response)
    }

    pub async fn get_monthly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetMonthlyBalanceByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("monthly_balance_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("card monthly balance by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_monthly_balance_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("card monthly balance by card ok", &[]);
        Ok(response)
    }

    pub async fn get_yearly_balance_by_card_number(&self, card_number: &str, year: i32) -> Result<Vec<AmountByPeriodResponse>, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetYearlyBalanceByCardNumber", &[("year", &year.to_string())]);
        let fingerprint = format!("yearly_balance_by_card:{}", card_year_fingerprint(card_number, year));

        if let Some(cached) = self.cache.get_stats(&fingerprint).await {
            envelope.success("card yearly balance by card cache hit", &[]);
            return Ok(cached);
        }
        let rows = match self.stats.get_yearly_balance_by_card_number(card_number, year).await {
            Ok(v) => v,
            Err(err) => return Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        };
        let response = to_amount_by_period_response(&rows);
        self.cache.set_stats(&fingerprint, &response).await;
        envelope.success("card yearly balance by card ok", &[]);
        Ok(response)
    }

    /// Part of the "dashboard family" named in spec §6.1 for card-service.
    pub async fn get_total_balance(&self) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalBalance", &[]);
        match self.stats.get_total_balance().await {
            Ok(total) => {
                envelope.success("card total balance ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        }
    }

    pub async fn get_total_balance_by_card_number(&self, card_number: &str) -> Result<i64, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "GetTotalBalanceByCardNumber", &[]);
        match self.stats.get_total_balance_by_card_number(card_number).await {
            Ok(total) => {
                envelope.success("card total balance by card ok", &[]);
                Ok(total)
            }
            Err(err) => Err(envelope.fail(ErrorKind::Repository, &err.to_string(), card_errors::err_card_not_found())),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::cache::InMemoryStore;
    use shared::events::NullPublisher;

    use crate::domain::entities::Card;
    use crate::repository::{MockCardCommandRepository, MockCardQueryRepository, MockCardStatsRepository};

    fn sample_card(user_id: Uuid, card_number: &str) -> Card {
        use fake::faker::name::en::Name;
        use fake::Fake;

        Card {
            id: Uuid::new_v4(),
            user_id,
            card_number: card_number.to_string(),
            holder_name: Name().fake(),
            card_type: "visa".to_string(),
            expire_date: chrono::Utc::now(),
            cvv: "123".to_string(),
            status: "active".to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            deleted_at: None,
        }
    }

    fn build_service(
        query: MockCardQueryRepository,
        command: MockCardCommandRepository,
        stats: MockCardStatsRepository,
    ) -> CardService {
        CardService::new(
            Arc::new(query),
            Arc::new(command),
            Arc::new(stats),
            CardCache::with_store(InMemoryStore::new(), 300, 300),
            Arc::new(NullPublisher::new()),
            Arc::new(MetricsRegistry::new_for_test()),
        )
    }

    #[tokio::test]
    async fn find_by_id_cache_hit_skips_repository() {
        let card = sample_card(Uuid::new_v4(), "4111111111111111");
        let response = to_card_response(&card);

        let mut query = MockCardQueryRepository::new();
        query.expect_find_by_id().times(0);

        let service = build_service(query, MockCardCommandRepository::new(), MockCardStatsRepository::new());
        service.cache.set_by_id(card.id, &response).await;

        let found = service.find_by_id(card.id).await.expect("cache hit must not fail");
        assert_eq!(found.id, card.id);
    }

    #[tokio::test]
    async fn find_by_id_miss_populates_cache() {
        let card = sample_card(Uuid::new_v4(), "4111111111111111");
        let card_id = card.id;

        let mut query = MockCardQueryRepository::new();
        query.expect_find_by_id().times(1).returning(move |_| Ok(Some(card.clone())));

        let service = build_service(query, MockCardCommandRepository::new(), MockCardStatsRepository::new());

        assert!(service.cache.get_by_id(card_id).await.is_none());
        let found = service.find_by_id(card_id).await.expect("lookup should succeed");
        assert_eq!(found.id, card_id);

        // Second call must hit the freshly populated cache, not the repository again.
        let cached = service.find_by_id(card_id).await.expect("second lookup should succeed");
        assert_eq!(cached.id, card_id);
    }

    #[tokio::test]
    async fn find_by_id_not_found_is_never_cached() {
        let mut query = MockCardQueryRepository::new();
        query.expect_find_by_id().returning(|_| Ok(None));

        let service = build_service(query, MockCardCommandRepository::new(), MockCardStatsRepository::new());

        let missing_id = Uuid::new_v4();
        let err = service.find_by_id(missing_id).await.expect_err("missing card must error");
        assert_eq!(err, card_errors::err_card_not_found());
        assert!(service.cache.get_by_id(missing_id).await.is_none());
    }

    #[tokio::test]
    async fn update_invalidates_id_card_number_and_user_caches() {
        let mut card = sample_card(Uuid::new_v4(), "4111111111111111");
        let card_id = card.id;
        let user_id = card.user_id;
        let card_number = card.card_number.clone();

        let mut command = MockCardCommandRepository::new();
        command.expect_update().returning(move |_, update| {
            card.holder_name = update.holder_name;
            Ok(Some(card.clone()))
        });

        let service = build_service(MockCardQueryRepository::new(), command, MockCardStatsRepository::new());

        // Seed all three cache slots a mutation is supposed to invalidate.
        let stale = to_card_response(&sample_card(user_id, &card_number));
        service.cache.set_by_id(card_id, &stale).await;
        service.cache.set_by_card_number(&card_number, &stale).await;
        service.cache.set_by_user(user_id, &vec![stale.clone()]).await;

        let update = UpdateCard {
            holder_name: "New Holder".to_string(),
            card_type: "visa".to_string(),
            expire_date: chrono::Utc::now(),
            cvv: "999".to_string(),
        };
        let updated = service.update(card_id, update).await.expect("update should succeed");
        assert_eq!(updated.holder_name, "New Holder");

        assert!(service.cache.get_by_id(card_id).await.is_none());
        assert!(service.cache.get_by_card_number(&card_number).await.is_none());
        assert!(service.cache.get_by_user(user_id).await.is_none());
    }

    #[tokio::test]
    async fn delete_permanent_requires_trashed_state() {
        let card = sample_card(Uuid::new_v4(), "4111111111111111");

        let mut query = MockCardQueryRepository::new();
        query.expect_find_by_id().returning({
            let card = card.clone();
            move |_| Ok(Some(card.clone()))
        });

        let mut command = MockCardCommandRepository::new();
        command.expect_delete_permanent().times(0);

        let service = build_service(query, command, MockCardStatsRepository::new());

        let err = service
            .delete_permanent(card.id)
            .await
            .expect_err("a non-trashed card must not be permanently deletable");
        assert_eq!(err, card_errors::err_card_not_trashed());
    }

    #[tokio::test]
    async fn delete_permanent_succeeds_once_trashed() {
        let mut card = sample_card(Uuid::new_v4(), "4111111111111111");
        card.deleted_at = Some(chrono::Utc::now());
        let card_id = card.id;

        let mut query = MockCardQueryRepository::new();
        query.expect_find_by_id().returning({
            let card = card.clone();
            move |_| Ok(Some(card.clone()))
        });

        let mut command = MockCardCommandRepository::new();
        command.expect_delete_permanent().times(1).returning(|_| Ok(true));

        let service = build_service(query, command, MockCardStatsRepository::new());
        service.delete_permanent(card_id).await.expect("trashed card should be deletable");
    }

    #[tokio::test]
    async fn create_invalidates_owners_card_listing() {
        let user_id = Uuid::new_v4();
        let created = sample_card(user_id, "4111111111111111");

        let mut command = MockCardCommandRepository::new();
        command.expect_create().returning({
            let created = created.clone();
            move |_| Ok(created.clone())
        });

        let service = build_service(MockCardQueryRepository::new(), command, MockCardStatsRepository::new());

        let stale = vec![to_card_response(&sample_card(user_id, "4000000000000000"))];
        service.cache.set_by_user(user_id, &stale).await;

        let new_card = NewCard {
            user_id,
            card_number: "4111111111111111".to_string(),
            holder_name: "Ada Lovelace".to_string(),
            card_type: "visa".to_string(),
            expire_date: chrono::Utc::now(),
            cvv: "123".to_string(),
        };
        let response = service.create(new_card).await.expect("create should succeed");
        assert_eq!(response.card_number, "4111111111111111");
        assert!(service.cache.get_by_user(user_id).await.is_none());
    }

    #[test]
    fn is_unique_violation_is_false_for_unrelated_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
