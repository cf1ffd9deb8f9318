//! # Error Taxonomy & Translators
//!
//! A closed set of error *kinds* and a single translator that turns any of
//! them into a trace-logged, span-marked, stable `ErrorResponse`.
//!
//! ## Kinds
//!
//! ```text
//! repository | token | json-marshal | publisher | random-string
//! invalid-id | password-op("not_match"|"hash"|"compare") | not-found
//! ```
//!
//! Callers never format error strings themselves. They pick the kind that
//! matches the failure and a predefined `ErrorResponse` from the relevant
//! per-domain catalogue (see the `catalogue` submodule and each service's
//! own `*_errors` module). `translate` is total and never panics.
//!
//! ## Status labels
//!
//! Every translation also yields a snake_case `<kind>_error_<method>` label,
//! which the observability envelope (`crate::envelope`) writes into the
//! method/status-keyed metric pair.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Gateway-internal error (HTTP glue only — out of scope per spec §1, kept
// thin per SPEC_FULL.md §2.2: none of the C1–C10 core ever returns this)
// =============================================================================

/// Infra-layer failures surfaced by `shared::database`, `shared::redis_client`,
/// and `shared::auth`. Never crosses the service boundary: every core
/// service method classifies its own failures into an [`ErrorKind`] and
/// returns an [`ErrorResponse`] instead. `GatewayError` exists only for the
/// out-of-scope HTTP routing glue (the gateway's own handlers), which is why
/// it carries an actix `ResponseError` impl that the core never needs.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("redis error: {0}")]
    RedisError(#[from] redis::RedisError),
    #[error("internal error: {message}")]
    InternalError { message: String },
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("validation error")]
    ValidationError(#[from] validator::ValidationErrors),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("missing authorization")]
    MissingAuth,
    #[error("account locked")]
    AccountLocked,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) | Self::RedisError(_) | Self::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::BadRequest { .. } | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired | Self::MissingAuth => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountLocked => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(error_response(
            "error",
            &self.to_string(),
            self.status_code().as_u16() as i32,
        ))
    }
}

// =============================================================================
// Error kinds
// =============================================================================

/// Reason a token-shaped operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailure {
    Invalid,
    Expired,
    Delete,
}

impl TokenFailure {
    fn label(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Expired => "expired",
            Self::Delete => "delete",
        }
    }
}

/// Reason a password operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordOpFailure {
    NotMatch,
    Hash,
    Compare,
}

impl PasswordOpFailure {
    fn label(self) -> &'static str {
        match self {
            Self::NotMatch => "not_match",
            Self::Hash => "hash",
            Self::Compare => "compare",
        }
    }
}

/// The closed set of error kinds a service method can classify a failure
/// into, per spec §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Repository,
    Token(TokenFailure),
    JsonMarshal,
    Publisher,
    RandomString,
    InvalidId,
    PasswordOp(PasswordOpFailure),
    NotFound,
}

impl ErrorKind {
    /// The `<kind>` fragment of the `<kind>_error_<method>` status label.
    pub fn tag(self) -> String {
        match self {
            Self::Repository => "repository".to_string(),
            Self::Token(f) => format!("token_{}", f.label()),
            Self::JsonMarshal => "json_marshal".to_string(),
            Self::Publisher => "publisher".to_string(),
            Self::RandomString => "random_string".to_string(),
            Self::InvalidId => "invalid_id".to_string(),
            Self::PasswordOp(f) => format!("password_op_{}", f.label()),
            Self::NotFound => "not_found".to_string(),
        }
    }
}

// =============================================================================
// Outward error envelope
// =============================================================================

/// The only shape ever returned to clients, regardless of the originating
/// kind. Matches spec §3.1 / §6.4 exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub code: i32,
}

/// Builds an `ErrorResponse` from literal parts. Used by every per-domain
/// catalogue.
pub fn error_response(status: &str, message: &str, code: i32) -> ErrorResponse {
    ErrorResponse {
        status: status.to_string(),
        message: message.to_string(),
        code,
    }
}

pub type ApiResult<T> = Result<T, ErrorResponse>;

// =============================================================================
// Translator (C2)
// =============================================================================

/// Generates a trace ID from a caller-supplied prefix. The prefix should be
/// the real method name (see the §9 open-question resolution in
/// `SPEC_FULL.md`: never reuse an unrelated method's prefix).
pub fn new_trace_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Translates a classified failure into a logged, span-marked, stable
/// `ErrorResponse`.
///
/// This is the single dispatch point the §9 redesign flag calls for:
/// "represent the error kind as a tagged variant and branch on it in a
/// single dispatch function; avoid class hierarchies." It never panics.
///
/// `method` is the current envelope's method name (used both as the trace
/// prefix and inside the `<kind>_error_<method>` status label). `detail` is
/// a short human-readable cause, logged but never exposed to the caller.
/// `response` is the predefined catalogue entry to hand back.
pub fn translate(
    kind: ErrorKind,
    method: &str,
    detail: &str,
    response: ErrorResponse,
) -> (String, ErrorResponse) {
    let trace_id = new_trace_id(method);
    let status_label = format!("{}_error_{}", kind.tag(), method);

    tracing::error!(
        trace_id = %trace_id,
        method = method,
        kind = %kind.tag(),
        detail = detail,
        status_code = response.code,
        "service method failed"
    );

    tracing::Span::current().record("error", &true);

    (status_label, response)
}

// =============================================================================
// Per-domain catalogues
// =============================================================================

/// Shared catalogue entries reused across every domain (role/auth plumbing).
pub mod catalogue {
    use super::error_response;
    use super::ErrorResponse;

    pub fn err_role_not_found() -> ErrorResponse {
        error_response("error", "role not found", 404)
    }

    pub fn err_internal_server_error() -> ErrorResponse {
        error_response("error", "internal server error", 500)
    }

    pub fn err_invalid_id() -> ErrorResponse {
        error_response("error", "invalid id supplied", 400)
    }

    pub fn err_failed_publish_event() -> ErrorResponse {
        error_response("error", "failed to publish event", 500)
    }

    pub fn err_failed_marshal_payload() -> ErrorResponse {
        error_response("error", "failed to marshal event payload", 500)
    }

    pub fn err_failed_generate_random_string() -> ErrorResponse {
        error_response("error", "failed to generate random string", 500)
    }
}

// =============================================================================
// Request validation (spec §2.9 — C10 handlers reject malformed bodies before
// any service method runs)
// =============================================================================

/// Turns a [`validator::ValidationErrors`] into the one `ErrorResponse` shape
/// every domain returns, so core service handlers can validate an inbound
/// DTO without reaching for [`GatewayError`] (which never crosses the
/// service boundary, per the doc comment on that type).
pub fn validation_error_response(errors: &validator::ValidationErrors) -> ErrorResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();
    error_response(
        "error",
        &format!("validation failed: {}", fields.join(", ")),
        400,
    )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_snake_case() {
        assert_eq!(ErrorKind::Repository.tag(), "repository");
        assert_eq!(
            ErrorKind::Token(TokenFailure::Expired).tag(),
            "token_expired"
        );
        assert_eq!(
            ErrorKind::PasswordOp(PasswordOpFailure::NotMatch).tag(),
            "password_op_not_match"
        );
        assert_eq!(ErrorKind::NotFound.tag(), "not_found");
    }

    #[test]
    fn trace_id_contains_prefix() {
        let id = new_trace_id("Login");
        assert!(id.starts_with("Login-"));
    }

    #[test]
    fn translate_never_panics_and_preserves_response() {
        let response = catalogue::err_role_not_found();
        let (label, returned) = translate(ErrorKind::NotFound, "Register", "role missing", response.clone());
        assert_eq!(label, "not_found_error_Register");
        assert_eq!(returned, response);
    }
}
