//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod dashboard_errors {
    use super::*;

    pub fn err_failed_total_balance() -> ErrorResponse {
        error_response("error", "failed to compute total balance", 500)
    }

    pub fn err_failed_total_topup_amount() -> ErrorResponse {
        error_response("error", "failed to compute total topup amount", 500)
    }

    pub fn err_failed_total_withdraw_amount() -> ErrorResponse {
        error_response("error", "failed to compute total withdraw amount", 500)
    }

    pub fn err_failed_total_transaction_amount() -> ErrorResponse {
        error_response("error", "failed to compute total transaction amount", 500)
    }

    pub fn err_failed_total_transfer_amount() -> ErrorResponse {
        error_response("error", "failed to compute total transfer amount", 500)
    }
}
