//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod transfer_errors {
    use super::*;

    pub fn err_transfer_not_found() -> ErrorResponse {
        error_response("error", "transfer not found", 404)
    }

    pub fn err_failed_create_transfer() -> ErrorResponse {
        error_response("error", "failed to create transfer", 500)
    }

    pub fn err_failed_update_transfer() -> ErrorResponse {
        error_response("error", "failed to update transfer", 500)
    }

    pub fn err_failed_trashed_transfer() -> ErrorResponse {
        error_response("error", "failed to trash transfer", 500)
    }

    pub fn err_failed_restore_transfer() -> ErrorResponse {
        error_response("error", "failed to restore transfer", 500)
    }

    pub fn err_failed_delete_transfer_permanent() -> ErrorResponse {
        error_response("error", "failed to permanently delete transfer", 500)
    }

    pub fn err_transfer_not_trashed() -> ErrorResponse {
        error_response("error", "transfer must be trashed before permanent deletion", 404)
    }
}
