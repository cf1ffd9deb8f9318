//! # payment-gateway - Merchant Service
//!
//! Owns the Merchant entity: lifecycle (create/update/status/soft-delete),
//! lookups by id/api_key/user, and the merchant-scoped transaction-amount
//! statistics/"dashboard family" named in spec §6.1. Publishes no events —
//! spec §6.2's topic table names no merchant-owned topic.
//!
//! All routes are prefixed with `/api/v1/merchants`; see `rpc::routes` for
//! the full table. `/metrics` and `/health` mirror every other service.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use prometheus::{Encoder, TextEncoder};
use shared::config::AppConfig;
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

use cache::MerchantCache;
use repository::postgres::PgMerchantRepository;
use service::MerchantService;

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
        "starting merchant-service"
    );

    let db_pool = database::create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    let redis_client = RedisClient::new(&config.redis)
        .await
        .expect("failed to connect to redis");

    let metrics = Arc::new(MetricsRegistry::new());
    let merchant_cache = MerchantCache::new(redis_client, config.cache_ttl.entity_seconds, config.cache_ttl.stats_seconds);
    let repo = Arc::new(PgMerchantRepository::new(db_pool));

    let merchant_service = Arc::new(MerchantService::new(
        repo.clone(),
        repo.clone(),
        repo,
        merchant_cache,
        metrics.clone(),
    ));

    let merchant_service_data = web::Data::new(merchant_service);
    let metrics_data = web::Data::new(metrics);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    info!("merchant-service listening on {}:{}", server_host, server_port);

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
            .app_data(merchant_service_data.clone())
            .app_data(metrics_data.clone())
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics))
            .configure(rpc::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
