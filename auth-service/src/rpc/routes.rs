//! Route table for the auth-service façade.

use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/register", web::post().to(handlers::register))
            .route("/login", web::post().to(handlers::login))
            .route("/refresh", web::post().to(handlers::refresh))
            .route("/forgot-password", web::post().to(handlers::forgot_password))
            .route("/reset-password", web::post().to(handlers::reset_password))
            .route("/verify-code", web::post().to(handlers::verify_code))
            .route("/me", web::get().to(handlers::get_me))
            .route("/users/{id}", web::get().to(handlers::find_by_id)),
    );
}
