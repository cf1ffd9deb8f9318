//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{AmountByPeriodResponse, SaldoResponse, SaldoResponseDeleteAt};
use super::entities::{AmountByPeriod, Saldo};

pub fn to_saldo_response(saldo: &Saldo) -> SaldoResponse {
    SaldoResponse {
        id: saldo.id,
        card_number: saldo.card_number.clone(),
        total_balance: saldo.total_balance,
        created_at: saldo.created_at.to_rfc3339(),
        updated_at: saldo.updated_at.to_rfc3339(),
    }
}

pub fn to_saldo_response_delete_at(saldo: &Saldo) -> SaldoResponseDeleteAt {
    SaldoResponseDeleteAt {
        saldo: to_saldo_response(saldo),
        deleted_at: saldo.deleted_at.map(|ts| ts.to_rfc3339()),
    }
}

pub fn to_saldos_response(saldos: &[Saldo]) -> Vec<SaldoResponse> {
    saldos.iter().map(to_saldo_response).collect()
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

    fn sample_saldo() -> Saldo {
        Saldo {
            id: Uuid::new_v4(),
            card_number: "4111111111111111".to_string(),
            total_balance: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let saldo = sample_saldo();
        assert_eq!(to_saldo_response(&saldo).id, to_saldo_response(&saldo).id);
        assert_eq!(to_saldo_response_delete_at(&saldo).deleted_at, None);
    }
}
