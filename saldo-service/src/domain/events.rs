//! Inbound event contract (spec §6.2): `saldo-service-topic-create-saldo`,
//! produced by card-service's `CreateCard` and consumed here.
//!
//! The spec's transport is opaque message-bus delivery; process bootstrap
//! and the consumer loop that drains the topic are named out of scope
//! (spec §1: "process bootstrap ... out of scope"). This module fixes the
//! payload shape both sides agree on so the RPC-facing `create` entry point
//! (invoked by whatever drains the topic) can deserialize it directly.

use serde::Deserialize;

pub const TOPIC_CREATE_SALDO: &str = "saldo-service-topic-create-saldo";

/// `{card_number, total_balance:0}` keyed by the new card's id.
#[derive(Debug, Clone, Deserialize)]
pub struct SaldoCreatedPayload {
    pub card_number: String,
    pub total_balance: i64,
}
