//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{AmountByPeriodResponse, CardResponse, CardResponseDeleteAt};
use super::entities::{AmountByPeriod, Card};

pub fn to_card_response(card: &Card) -> CardResponse {
    CardResponse {
        id: card.id,
        user_id: card.user_id,
        card_number: card.card_number.clone(),
        holder_name: card.holder_name.clone(),
        card_type: card.card_type.clone(),
        expire_date: card.expire_date.to_rfc3339(),
        status: card.status.clone(),
        created_at: card.created_at.to_rfc3339(),
        updated_at: card.updated_at.to_rfc3339(),
    }
}

pub fn to_card_response_delete_at(card: &Card) -> CardResponseDeleteAt {
    CardResponseDeleteAt {
        card: to_card_response(card),
        deleted_at: card.deleted_at.map(|ts| ts.to_rfc3339()),
    }
}

pub fn to_cards_response(cards: &[Card]) -> Vec<CardResponse> {
    cards.iter().map(to_card_response).collect()
}

pub fn to_amount_by_period_response(rows: &[AmountByPeriod]) -> Vec<AmountByPeriodResponse> {
    rows.iter()
        .map(|r| AmountByPeriodResponse {
            period: r.period,
            total_amount: r.total_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_card() -> Card {
        Card {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            card_number: "4111111111111111".to_string(),
            holder_name: "Jane Doe".to_string(),
            card_type: "visa".to_string(),
            expire_date: Utc::now(),
            cvv: "123".to_string(),
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let card = sample_card();
        assert_eq!(to_card_response(&card).id, to_card_response(&card).id);
        assert_eq!(to_card_response_delete_at(&card).deleted_at, None);
    }
}
