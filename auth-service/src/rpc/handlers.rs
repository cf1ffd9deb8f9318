//! Actix-web handlers translating HTTP+JSON requests into `AuthService`
//! calls and `ErrorResponse`/`UserResponse` back into HTTP bodies.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use shared::auth::JwtService;
use shared::errors::ErrorResponse;
use uuid::Uuid;

use crate::domain::dto::{
    ForgotPasswordRequest, LoginRequest, RefreshRequest, RegisterRequest, ResetPasswordRequest,
    VerifyCodeRequest,
};
use crate::service::AuthService;

fn respond_error(err: ErrorResponse) -> HttpResponse {
    HttpResponse::build(
        actix_web::http::StatusCode::from_u16(err.code as u16)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
    )
    .json(err)
}

pub async fn register(service: web::Data<Arc<AuthService>>, body: web::Json<RegisterRequest>) -> HttpResponse {
    match service
        .register(&body.email, &body.password, &body.first_name, &body.last_name)
        .await
    {
        Ok(user) => HttpResponse::Created().json(user),
        Err(err) => respond_error(err),
    }
}

pub async fn login(service: web::Data<Arc<AuthService>>, body: web::Json<LoginRequest>) -> HttpResponse {
    match service.login(&body.email, &body.password).await {
        Ok(tokens) => HttpResponse::Ok().json(tokens),
        Err(err) => respond_error(err),
    }
}

pub async fn refresh(service: web::Data<Arc<AuthService>>, body: web::Json<RefreshRequest>) -> HttpResponse {
    match service.refresh(&body.refresh_token).await {
        Ok(tokens) => HttpResponse::Ok().json(tokens),
        Err(err) => respond_error(err),
    }
}

pub async fn forgot_password(
    service: web::Data<Arc<AuthService>>,
    body: web::Json<ForgotPasswordRequest>,
) -> HttpResponse {
    match service.forgot_password(&body.email).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn reset_password(
    service: web::Data<Arc<AuthService>>,
    body: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    match service
        .reset_password(&body.reset_token, &body.password, &body.confirm_password)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn verify_code(
    service: web::Data<Arc<AuthService>>,
    body: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    match service.verify_code(&body.verification_code).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

/// `GetMe`: resolves the caller from the bearer access token, then looks the
/// user up fresh (spec §6.1) rather than trusting token claims verbatim.
pub async fn get_me(
    service: web::Data<Arc<AuthService>>,
    jwt: web::Data<Arc<JwtService>>,
    req: actix_web::HttpRequest,
) -> HttpResponse {
    let auth_header = match req.headers().get("Authorization").and_then(|h| h.to_str().ok()) {
        Some(h) => h,
        None => return HttpResponse::Unauthorized().json(serde_json::json!({"status": "error", "message": "missing authorization", "code": 401})),
    };
    let token = match JwtService::extract_from_header(auth_header) {
        Ok(t) => t,
        Err(_) => return HttpResponse::Unauthorized().json(serde_json::json!({"status": "error", "message": "invalid authorization header", "code": 401})),
    };
    let claims = match jwt.validate_access_token(token) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().json(serde_json::json!({"status": "error", "message": "invalid or expired token", "code": 401})),
    };

    match service.find_by_id(claims.sub).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_id(service: web::Data<Arc<AuthService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.find_by_id(path.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => respond_error(err),
    }
}
