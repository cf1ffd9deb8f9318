//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{AmountByMethodResponse, AmountByPeriodResponse, TopupResponse, TopupResponseDeleteAt};
use super::entities::{AmountByMethod, AmountByPeriod, Topup};

pub fn to_topup_response(topup: &Topup) -> TopupResponse {
    TopupResponse {
        id: topup.id,
        card_number: topup.card_number.clone(),
        topup_amount: topup.topup_amount,
        topup_method: topup.topup_method.clone(),
        status: topup.status.clone(),
        created_at: topup.created_at.to_rfc3339(),
        updated_at: topup.updated_at.to_rfc3339(),
    }
}

pub fn to_topup_response_delete_at(topup: &Topup) -> TopupResponseDeleteAt {
    TopupResponseDeleteAt {
        topup: to_topup_response(topup),
        deleted_at: topup.deleted_at.map(|ts| ts.to_rfc3339()),
    }
}

pub fn to_topups_response(topups: &[Topup]) -> Vec<TopupResponse> {
    topups.iter().map(to_topup_response).collect()
}

pub fn to_amount_by_period_response(rows: &[AmountByPeriod]) -> Vec<AmountByPeriodResponse> {
    rows.iter()
        .map(|r| AmountByPeriodResponse { period: r.period, total_amount: r.total_amount })
        .collect()
}

pub fn to_amount_by_method_response(rows: &[AmountByMethod]) -> Vec<AmountByMethodResponse> {
    rows.iter()
        .map(|r| AmountByMethodResponse { method: r.method.clone(), total_amount: r.total_amount })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_topup() -> Topup {
        Topup {
            id: Uuid::new_v4(),
            card_number: "4111111111111111".to_string(),
            topup_amount: 10_000,
            topup_method: "bank_transfer".to_string(),
            status: "success".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let topup = sample_topup();
        assert_eq!(to_topup_response(&topup).id, to_topup_response(&topup).id);
        assert_eq!(to_topup_response_delete_at(&topup).deleted_at, None);
    }
}
