//! # payment-gateway - Authentication Service
//!
//! The **auth-service** owns identity: registration, login, refresh-token
//! rotation, password reset, and email verification (spec §4.7). It is one
//! of the nine domain services behind the `gateway` façade.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      RPC façade (rpc/)                          │
//! │           actix-web JSON request/reply handlers                 │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Service layer (service/)                       │
//! │   AuthService: Register, Login, Refresh, ForgotPassword,        │
//! │   ResetPassword, VerifyCode, FindById                           │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                Repository layer (repository/)                   │
//! │   UserRepository, RoleRepository, UserRoleRepository,            │
//! │   RefreshTokenRepository, ResetTokenRepository (Postgres)        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Endpoints
//!
//! All routes are prefixed with `/api/v1/auth`:
//!
//! | Method | Endpoint            | Description                 |
//! |--------|----------------------|------------------------------|
//! | POST   | `/register`          | Create a new account         |
//! | POST   | `/login`             | Authenticate, issue tokens   |
//! | POST   | `/refresh`           | Rotate an access/refresh pair|
//! | POST   | `/forgot-password`   | Issue a reset token          |
//! | POST   | `/reset-password`    | Consume a reset token        |
//! | POST   | `/verify-code`       | Consume a verification code  |
//! | GET    | `/me`                | Caller's own profile         |
//! | GET    | `/users/{id}`        | Profile lookup by id         |
//! | GET    | `/metrics`           | Prometheus text exposition   |
//! | GET    | `/health`            | Liveness check                |

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use prometheus::{Encoder, TextEncoder};
use shared::auth::{JwtService, PasswordHasher};
use shared::config::AppConfig;
use shared::events::{LapinPublisher, Publisher};
use shared::redis_client::RedisClient;
use shared::telemetry::MetricsRegistry;
use shared::{database, tracing_config};
use std::sync::Arc;
use tracing::{info, warn};

mod cache;
mod domain;
mod errors;
mod repository;
mod rpc;
mod service;
mod util;

use cache::AuthCache;
use repository::postgres::{
    PgRefreshTokenRepository, PgResetTokenRepository, PgRoleRepository, PgUserRepository,
    PgUserRoleRepository,
};
use service::AuthService;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

async fn metrics(registry: web::Data<Arc<MetricsRegistry>>) -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&registry.registry().gather(), &mut buffer) {
        warn!(error = %err, "failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4; charset=utf-8")
        .body(buffer)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env().expect("failed to load configuration");
    tracing_config::init_tracing(&config.service_name, config.is_production());

    info!(
        service = %config.service_name,
        host = %config.server.host,
        port = %config.server.port,
        "starting auth-service"
    );

    let db_pool = database::create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    let redis_client = RedisClient::new(&config.redis)
        .await
        .expect("failed to connect to redis");

    let amqp_url = std::env::var("AMQP_URL").unwrap_or_else(|_| "amqp://127.0.0.1:5672/%2f".to_string());
    let publisher: Arc<dyn Publisher> = Arc::new(
        LapinPublisher::connect(&amqp_url)
            .await
            .expect("failed to connect to AMQP broker"),
    );

    let metrics = Arc::new(MetricsRegistry::new());
    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
    let password_hasher = Arc::new(PasswordHasher::new());
    let auth_cache = AuthCache::new(redis_client.clone());

    let auth_service = Arc::new(AuthService::new(
        Arc::new(PgUserRepository::new(db_pool.clone())),
        Arc::new(PgRoleRepository::new(db_pool.clone())),
        Arc::new(PgUserRoleRepository::new(db_pool.clone())),
        Arc::new(PgRefreshTokenRepository::new(db_pool.clone())),
        Arc::new(PgResetTokenRepository::new(db_pool.clone())),
        auth_cache,
        publisher,
        password_hasher,
        jwt_service.clone(),
        metrics.clone(),
        config.auth_policy.default_role_name.clone(),
    ));

    let auth_service_data = web::Data::new(auth_service);
    let jwt_service_data = web::Data::new(jwt_service);
    let metrics_data = web::Data::new(metrics);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    info!("auth-service listening on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(auth_service_data.clone())
            .app_data(jwt_service_data.clone())
            .app_data(metrics_data.clone())
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics))
            .configure(rpc::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
