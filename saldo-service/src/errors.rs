//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod saldo_errors {
    use super::*;

    pub fn err_saldo_not_found() -> ErrorResponse {
        error_response("error", "saldo not found", 404)
    }

    pub fn err_saldo_already_exists() -> ErrorResponse {
        error_response("error", "saldo already exists for card number", 409)
    }

    pub fn err_failed_create_saldo() -> ErrorResponse {
        error_response("error", "failed to create saldo", 500)
    }

    pub fn err_failed_update_saldo() -> ErrorResponse {
        error_response("error", "failed to update saldo", 500)
    }

    pub fn err_failed_trashed_saldo() -> ErrorResponse {
        error_response("error", "failed to trash saldo", 500)
    }

    pub fn err_failed_restore_saldo() -> ErrorResponse {
        error_response("error", "failed to restore saldo", 500)
    }

    pub fn err_failed_delete_saldo_permanent() -> ErrorResponse {
        error_response("error", "failed to permanently delete saldo", 500)
    }

    pub fn err_saldo_not_trashed() -> ErrorResponse {
        error_response("error", "saldo must be trashed before permanent deletion", 404)
    }
}
