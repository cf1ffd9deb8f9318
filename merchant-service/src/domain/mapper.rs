//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{
    AmountByPeriodResponse, MerchantResponse, MerchantResponseDeleteAt, PaymentMethodAmountResponse,
};
use super::entities::{AmountByPeriod, Merchant, PaymentMethodAmount};

pub fn to_merchant_response(merchant: &Merchant) -> MerchantResponse {
    MerchantResponse {
        id: merchant.id,
        name: merchant.name.clone(),
        user_id: merchant.user_id,
        api_key: merchant.api_key.clone(),
        status: merchant.status.clone(),
        created_at: merchant.created_at.to_rfc3339(),
        updated_at: merchant.updated_at.to_rfc3339(),
    }
}

pub fn to_merchant_response_delete_at(merchant: &Merchant) -> MerchantResponseDeleteAt {
    MerchantResponseDeleteAt {
        merchant: to_merchant_response(merchant),
        deleted_at: merchant.deleted_at.map(|ts| ts.to_rfc3339()),
    }
}

pub fn to_merchants_response(merchants: &[Merchant]) -> Vec<MerchantResponse> {
    merchants.iter().map(to_merchant_response).collect()
}

pub fn to_amount_by_period_response(rows: &[AmountByPeriod]) -> Vec<AmountByPeriodResponse> {
    rows.iter()
        .map(|r| AmountByPeriodResponse {
            period: r.period,
            total_amount: r.total_amount,
        })
        .collect()
}

pub fn to_payment_method_amount_response(rows: &[PaymentMethodAmount]) -> Vec<PaymentMethodAmountResponse> {
    rows.iter()
        .map(|r| PaymentMethodAmountResponse {
            period: r.period,
            payment_method: r.payment_method.clone(),
            total_amount: r.total_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_merchant() -> Merchant {
        Merchant {
            id: Uuid::new_v4(),
            name: "Acme Inc".to_string(),
            user_id: Uuid::new_v4(),
            api_key: "key-123".to_string(),
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let merchant = sample_merchant();
        assert_eq!(to_merchant_response(&merchant).id, to_merchant_response(&merchant).id);
        assert_eq!(to_merchant_response_delete_at(&merchant).deleted_at, None);
    }
}
