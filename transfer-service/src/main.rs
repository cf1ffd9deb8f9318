//! # payment-gateway - Transfer Service
//!
//! Owns the Transfer entity: card-to-card transfers (spec §4.4/§4.8), the
//! one entity with a sender/receiver split, and its amount statistics
//! family.
//!
//! All routes are prefixed with `/api/v1/transfers`; see `rpc::routes` for
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

use cache::TransferCache;
use repository::postgres::PgTransferRepository;
use service::TransferService;

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
        "starting transfer-service"
    );

    let db_pool = database::create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    let redis_client = RedisClient::new(&config.redis)
        .await
        .expect("failed to connect to redis");

    let metrics = Arc::new(MetricsRegistry::new());
    let transfer_cache = TransferCache::new(redis_client, config.cache_ttl.entity_seconds, config.cache_ttl.stats_seconds);
    let repo = Arc::new(PgTransferRepository::new(db_pool));

    let transfer_service = Arc::new(TransferService::new(repo.clone(), repo.clone(), repo, transfer_cache, metrics.clone()));

    let transfer_service_data = web::Data::new(transfer_service);
    let metrics_data = web::Data::new(metrics);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    info!("transfer-service listening on {}:{}", server_host, server_port);

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
            .app_data(transfer_service_data.clone())
            .app_data(metrics_data.clone())
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics))
            .configure(rpc::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
