//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{AmountByPeriodResponse, TransactionResponse, TransactionResponseDeleteAt};
use super::entities::{AmountByPeriod, Transaction};

pub fn to_transaction_response(transaction: &Transaction) -> TransactionResponse {
    TransactionResponse {
        id: transaction.id,
        card_number: transaction.card_number.clone(),
        transaction_amount: transaction.transaction_amount,
        transaction_method: transaction.transaction_method.clone(),
        status: transaction.status.clone(),
        created_at: transaction.created_at.to_rfc3339(),
        updated_at: transaction.updated_at.to_rfc3339(),
    }
}

pub fn to_transaction_response_delete_at(transaction: &Transaction) -> TransactionResponseDeleteAt {
    TransactionResponseDeleteAt {
        transaction: to_transaction_response(transaction),
        deleted_at: transaction.deleted_at.map(|ts| ts.to_rfc3339()),
    }
}

pub fn to_transactions_response(transactions: &[Transaction]) -> Vec<TransactionResponse> {
    transactions.iter().map(to_transaction_response).collect()
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

    fn sample_transaction() -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            card_number: "4111111111111111".to_string(),
            transaction_amount: 25_000,
            transaction_method: Some("debit".to_string()),
            status: "success".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let transaction = sample_transaction();
        assert_eq!(to_transaction_response(&transaction).id, to_transaction_response(&transaction).id);
        assert_eq!(to_transaction_response_delete_at(&transaction).deleted_at, None);
    }
}
