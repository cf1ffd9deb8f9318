//! Outbound event payload published on `CreateCard` (spec §6.2).

use serde::Serialize;
use uuid::Uuid;

pub const TOPIC_CREATE_SALDO: &str = "saldo-service-topic-create-saldo";

/// `{card_number, total_balance:0}`, keyed by the new card's id (spec
/// §3.1 "Saldo ... created as a side-effect of Card creation with zero
/// balance" and §6.2's topic table).
#[derive(Debug, Clone, Serialize)]
pub struct SaldoCreatedPayload {
    pub card_number: String,
    pub total_balance: i64,
}

pub fn saldo_created_payload(card_number: &str) -> SaldoCreatedPayload {
    SaldoCreatedPayload {
        card_number: card_number.to_string(),
        total_balance: 0,
    }
}

pub fn publish_key(card_id: Uuid) -> String {
    card_id.to_string()
}
