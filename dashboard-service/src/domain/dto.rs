//! Response DTOs for the dashboard aggregator (C8). Composite shapes only —
//! the aggregator owns no entity of its own (spec §4.8).

use serde::{Deserialize, Serialize};

/// `{total_balance, total_topup, total_withdraw, total_transaction,
/// total_transfer}` exactly as named in spec §4.8.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_balance: i64,
    pub total_topup_amount: i64,
    pub total_withdraw_amount: i64,
    pub total_transaction_amount: i64,
    pub total_transfer_amount: i64,
}

/// The per-card-number variant named in spec §4.8: "with sent/received
/// separated" — only transfer has a sender/receiver split (spec §3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardByCardResponse {
    pub card_number: String,
    pub total_balance: i64,
    pub total_topup_amount: i64,
    pub total_withdraw_amount: i64,
    pub total_transaction_amount: i64,
    pub total_transfer_amount_sent: i64,
    pub total_transfer_amount_received: i64,
}
