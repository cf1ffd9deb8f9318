//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{AmountByPeriodResponse, TransferResponse, TransferResponseDeleteAt};
use super::entities::{AmountByPeriod, Transfer};

pub fn to_transfer_response(transfer: &Transfer) -> TransferResponse {
    TransferResponse {
        id: transfer.id,
        transfer_from: transfer.transfer_from.clone(),
        transfer_to: transfer.transfer_to.clone(),
        transfer_amount: transfer.transfer_amount,
        status: transfer.status.clone(),
        created_at: transfer.created_at.to_rfc3339(),
        updated_at: transfer.updated_at.to_rfc3339(),
    }
}

pub fn to_transfer_response_delete_at(transfer: &Transfer) -> TransferResponseDeleteAt {
    TransferResponseDeleteAt {
        transfer: to_transfer_response(transfer),
        deleted_at: transfer.deleted_at.map(|ts| ts.to_rfc3339()),
    }
}

pub fn to_transfers_response(transfers: &[Transfer]) -> Vec<TransferResponse> {
    transfers.iter().map(to_transfer_response).collect()
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

    fn sample_transfer() -> Transfer {
        Transfer {
            id: Uuid::new_v4(),
            transfer_from: "4111111111111111".to_string(),
            transfer_to: "4222222222222222".to_string(),
            transfer_amount: 2_500,
            status: "success".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let transfer = sample_transfer();
        assert_eq!(to_transfer_response(&transfer).id, to_transfer_response(&transfer).id);
        assert_eq!(to_transfer_response_delete_at(&transfer).deleted_at, None);
    }
}
