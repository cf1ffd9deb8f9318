//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod transaction_errors {
    use super::*;

    pub fn err_transaction_not_found() -> ErrorResponse {
        error_response("error", "transaction not found", 404)
    }

    pub fn err_failed_create_transaction() -> ErrorResponse {
        error_response("error", "failed to create transaction", 500)
    }

    pub fn err_failed_update_transaction() -> ErrorResponse {
        error_response("error", "failed to update transaction", 500)
    }

    pub fn err_failed_trashed_transaction() -> ErrorResponse {
        error_response("error", "failed to trash transaction", 500)
    }

    pub fn err_failed_restore_transaction() -> ErrorResponse {
        error_response("error", "failed to restore transaction", 500)
    }

    pub fn err_failed_delete_transaction_permanent() -> ErrorResponse {
        error_response("error", "failed to permanently delete transaction", 500)
    }

    pub fn err_transaction_not_trashed() -> ErrorResponse {
        error_response("error", "transaction must be trashed before permanent deletion", 404)
    }
}
