//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod topup_errors {
    use super::*;

    pub fn err_topup_not_found() -> ErrorResponse {
        error_response("error", "topup not found", 404)
    }

    pub fn err_failed_create_topup() -> ErrorResponse {
        error_response("error", "failed to create topup", 500)
    }

    pub fn err_failed_update_topup() -> ErrorResponse {
        error_response("error", "failed to update topup", 500)
    }

    pub fn err_failed_trashed_topup() -> ErrorResponse {
        error_response("error", "failed to trash topup", 500)
    }

    pub fn err_failed_restore_topup() -> ErrorResponse {
        error_response("error", "failed to restore topup", 500)
    }

    pub fn err_failed_delete_topup_permanent() -> ErrorResponse {
        error_response("error", "failed to permanently delete topup", 500)
    }

    pub fn err_topup_not_trashed() -> ErrorResponse {
        error_response("error", "topup must be trashed before permanent deletion", 404)
    }
}
