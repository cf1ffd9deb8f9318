//! # payment-gateway - Card Service
//!
//! Owns the Card entity: lifecycle (create/update/status/soft-delete),
//! lookups, and the card-scoped balance statistics/"dashboard family"
//! named in spec §6.1. `CreateCard` also publishes the Saldo-creation
//! event consumed (conceptually) by `saldo-service`.
//!
//! All routes are prefixed with `/api/v1/cards`; see `rpc::routes` for the
//! full table. `/metrics` and `/health` mirror every other service.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use prometheus::{Encoder, TextEncoder};
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

use cache::CardCache;
use repository::postgres::PgCardRepository;
use service::CardService;

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
        "starting card-service"
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
    let card_cache = CardCache::new(redis_client, config.cache_ttl.entity_seconds, config.cache_ttl.stats_seconds);
    let repo = Arc::new(PgCardRepository::new(db_pool));

    let card_service = Arc::new(CardService::new(
        repo.clone(),
        repo.clone(),
        repo,
        card_cache,
        publisher,
        metrics.clone(),
    ));

    let card_service_data = web::Data::new(card_service);
    let metrics_data = web::Data::new(metrics);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    info!("card-service listening on {}:{}", server_host, server_port);

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
            .app_data(card_service_data.clone())
            .app_data(metrics_data.clone())
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics))
            .configure(rpc::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
