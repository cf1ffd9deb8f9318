//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod withdraw_errors {
    use super::*;

    pub fn err_withdraw_not_found() -> ErrorResponse {
        error_response("error", "withdraw not found", 404)
    }

    pub fn err_failed_create_withdraw() -> ErrorResponse {
        error_response("error", "failed to create withdraw", 500)
    }

    pub fn err_failed_update_withdraw() -> ErrorResponse {
        error_response("error", "failed to update withdraw", 500)
    }

    pub fn err_failed_trashed_withdraw() -> ErrorResponse {
        error_response("error", "failed to trash withdraw", 500)
    }

    pub fn err_failed_restore_withdraw() -> ErrorResponse {
        error_response("error", "failed to restore withdraw", 500)
    }

    pub fn err_failed_delete_withdraw_permanent() -> ErrorResponse {
        error_response("error", "failed to permanently delete withdraw", 500)
    }

    pub fn err_withdraw_not_trashed() -> ErrorResponse {
        error_response("error", "withdraw must be trashed before permanent deletion", 404)
    }
}
