//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{AmountByPeriodResponse, WithdrawResponse, WithdrawResponseDeleteAt};
use super::entities::{AmountByPeriod, Withdraw};

pub fn to_withdraw_response(withdraw: &Withdraw) -> WithdrawResponse {
    WithdrawResponse {
        id: withdraw.id,
        card_number: withdraw.card_number.clone(),
        withdraw_amount: withdraw.withdraw_amount,
        status: withdraw.status.clone(),
        created_at: withdraw.created_at.to_rfc3339(),
        updated_at: withdraw.updated_at.to_rfc3339(),
    }
}

pub fn to_withdraw_response_delete_at(withdraw: &Withdraw) -> WithdrawResponseDeleteAt {
    WithdrawResponseDeleteAt {
        withdraw: to_withdraw_response(withdraw),
        deleted_at: withdraw.deleted_at.map(|ts| ts.to_rfc3339()),
    }
}

pub fn to_withdraws_response(withdraws: &[Withdraw]) -> Vec<WithdrawResponse> {
    withdraws.iter().map(to_withdraw_response).collect()
}

pub fn to_amount_by_period_response(rows: &[AmountByPeriod]) -> Vec<AmountByPeriodResponse> {
    rows.iter()
        .map(|r| AmountByPeriodResponse { period: r.period, total_amount: r.total_amount })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_withdraw() -> Withdraw {
        Withdraw {
            id: Uuid::new_v4(),
            card_number: "4111111111111111".to_string(),
            withdraw_amount: 5_000,
            status: "success".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let withdraw = sample_withdraw();
        assert_eq!(to_withdraw_response(&withdraw).id, to_withdraw_response(&withdraw).id);
        assert_eq!(to_withdraw_response_delete_at(&withdraw).deleted_at, None);
    }
}
