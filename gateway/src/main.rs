//! # payment-gateway — API Gateway
//!
//! The RPC façade named C10 in spec §1: translates inbound HTTP/JSON
//! requests into the request each domain service's own HTTP façade
//! already expects, and applies the one cross-cutting concern that does
//! not belong to any single domain — bearer-token authentication (see
//! `auth_middleware`). Everything past that gate is opaque forwarding;
//! per spec §1 this RPC façade is "specified only at its interface."

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use prometheus::{Encoder, TextEncoder};
use shared::auth::middleware::AuthMiddleware;
use shared::auth::jwt::JwtService;
use shared::telemetry::MetricsRegistry;
use shared::tracing_config;
use std::sync::Arc;
use tracing::{info, warn};

mod auth_middleware;
mod config;
mod handlers;
mod proxy;
mod routes;

use config::GatewayConfig;

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
    let config = GatewayConfig::from_env().expect("failed to load configuration");
    tracing_config::init_tracing(&config.service_name, config.is_production());

    info!(
        service = %config.service_name,
        host = %config.server.host,
        port = %config.server.port,
        "starting gateway"
    );

    let metrics = Arc::new(MetricsRegistry::new());
    let http_client = reqwest::Client::new();
    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
    let auth = AuthMiddleware::new(jwt_service);

    let upstreams = config.upstreams.clone();
    let metrics_data = web::Data::new(metrics);
    let http_client_data = web::Data::new(http_client);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    info!("gateway listening on {}:{}", server_host, server_port);

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
            .wrap(auth_middleware::RequireAuth::new(auth.clone()))
            .app_data(http_client_data.clone())
            .app_data(metrics_data.clone())
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics))
            .configure(|cfg| routes::configure(cfg, &upstreams))
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
