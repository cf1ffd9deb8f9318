//! Per-domain error catalogue (spec §4.2 / §6.4): the only `ErrorResponse`
//! values this service ever hands back to a caller.

use shared::errors::{error_response, ErrorResponse};

pub mod user_errors {
    use super::*;

    pub fn err_user_not_found() -> ErrorResponse {
        error_response("error", "user not found", 404)
    }

    pub fn err_user_already_exists() -> ErrorResponse {
        error_response("error", "user already exists", 409)
    }

    pub fn err_failed_create_user() -> ErrorResponse {
        error_response("error", "failed to create user", 500)
    }

    pub fn err_failed_update_user() -> ErrorResponse {
        error_response("error", "failed to update user", 500)
    }

    pub fn err_invalid_credentials() -> ErrorResponse {
        error_response("error", "invalid email or password", 401)
    }

    pub fn err_not_verified() -> ErrorResponse {
        error_response("error", "account is not verified", 403)
    }

    pub fn err_password_mismatch() -> ErrorResponse {
        error_response("error", "password and confirmation do not match", 400)
    }
}

pub mod role_errors {
    use super::*;

    pub fn err_role_not_found() -> ErrorResponse {
        error_response("error", "default role not found", 500)
    }

    pub fn err_failed_assign_role() -> ErrorResponse {
        error_response("error", "failed to assign role", 500)
    }
}

pub mod refresh_token_errors {
    use super::*;

    pub fn err_invalid_token() -> ErrorResponse {
        error_response("error", "invalid refresh token", 401)
    }

    pub fn err_expired_token() -> ErrorResponse {
        error_response("error", "refresh token expired", 401)
    }

    pub fn err_failed_rotate_token() -> ErrorResponse {
        error_response("error", "failed to rotate refresh token", 500)
    }
}

pub mod reset_token_errors {
    use super::*;

    pub fn err_invalid_reset_token() -> ErrorResponse {
        error_response("error", "reset token not found or expired", 404)
    }

    pub fn err_failed_create_reset_token() -> ErrorResponse {
        error_response("error", "failed to create reset token", 500)
    }
}
