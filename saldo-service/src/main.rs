//! # payment-gateway - Saldo Service
//!
//! Owns the Saldo entity: the per-card balance row created as a side
//! effect of `card-service`'s `CreateCard` (spec §3.1/§6.2), its lifecycle,
//! and the balance statistics family shared with `card-service`.
//!
//! All routes are prefixed with `/api/v1/saldos`; see `rpc::routes` for the
//! full table. `/metrics` and `/health` mirror every other service.

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

use cache::SaldoCache;
use repository::postgres::PgSaldoRepository;
use service::SaldoService;

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
        "starting saldo-service"
    );

    let db_pool = database::create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    let redis_client = RedisClient::new(&config.redis)
        .await
        .expect("failed to connect to redis");

    let metrics = Arc::new(MetricsRegistry::new());
    let saldo_cache = SaldoCache::new(redis_client, config.cache_ttl.entity_seconds, config.cache_ttl.stats_seconds);
    let repo = Arc::new(PgSaldoRepository::new(db_pool));

    let saldo_service = Arc::new(SaldoService::new(repo.clone(), repo.clone(), repo, saldo_cache, metrics.clone()));

    let saldo_service_data = web::Data::new(saldo_service);
    let metrics_data = web::Data::new(metrics);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    info!("saldo-service listening on {}:{}", server_host, server_port);

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
            .app_data(saldo_service_data.clone())
            .app_data(metrics_data.clone())
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics))
            .configure(rpc::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
