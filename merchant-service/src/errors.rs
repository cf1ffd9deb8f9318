//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod merchant_errors {
    use super::*;

    pub fn err_merchant_not_found() -> ErrorResponse {
        error_response("error", "merchant not found", 404)
    }

    pub fn err_merchant_already_exists() -> ErrorResponse {
        error_response("error", "api key already in use", 409)
    }

    pub fn err_failed_create_merchant() -> ErrorResponse {
        error_response("error", "failed to create merchant", 500)
    }

    pub fn err_failed_update_merchant() -> ErrorResponse {
        error_response("error", "failed to update merchant", 500)
    }

    pub fn err_failed_trashed_merchant() -> ErrorResponse {
        error_response("error", "failed to trash merchant", 500)
    }

    pub fn err_failed_restore_merchant() -> ErrorResponse {
        error_response("error", "failed to restore merchant", 500)
    }

    pub fn err_failed_delete_merchant_permanent() -> ErrorResponse {
        error_response("error", "failed to permanently delete merchant", 500)
    }

    pub fn err_merchant_not_trashed() -> ErrorResponse {
        error_response("error", "merchant must be trashed before permanent deletion", 404)
    }
}
