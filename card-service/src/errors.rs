//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod card_errors {
    use super::*;

    pub fn err_card_not_found() -> ErrorResponse {
        error_response("error", "card not found", 404)
    }

    pub fn err_card_already_exists() -> ErrorResponse {
        error_response("error", "card number already in use", 409)
    }

    pub fn err_failed_create_card() -> ErrorResponse {
        error_response("error", "failed to create card", 500)
    }

    pub fn err_failed_update_card() -> ErrorResponse {
        error_response("error", "failed to update card", 500)
    }

    pub fn err_failed_trashed_card() -> ErrorResponse {
        error_response("error", "failed to trash card", 500)
    }

    pub fn err_failed_restore_card() -> ErrorResponse {
        error_response("error", "failed to restore card", 500)
    }

    pub fn err_failed_delete_card_permanent() -> ErrorResponse {
        error_response("error", "failed to permanently delete card", 500)
    }

    pub fn err_card_not_trashed() -> ErrorResponse {
        error_response("error", "card must be trashed before permanent deletion", 404)
    }
}
