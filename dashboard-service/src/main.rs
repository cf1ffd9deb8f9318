//! # payment-gateway - Dashboard Service
//!
//! The composite aggregator (spec §4.8): fans out across the other
//! services' tables directly (same Postgres database, its own pool) and
//! composes totals for balances, top-ups, withdrawals, transactions and
//! transfers. Owns no entity and publishes no events.
//!
//! All routes are prefixed with `/api/v1/dashboard`; see `rpc::routes`
//! for the full table. `/metrics` and `/health` mirror every other
//! service.

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

use cache::DashboardCache;
use repository::postgres::PgDashboardRepository;
use service::DashboardService;

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
        "starting dashboard-service"
    );

    let db_pool = database::create_pool(&config.database)
        .await
        .expect("failed to create database pool");

    let redis_client = RedisClient::new(&config.redis)
        .await
        .expect("failed to connect to redis");

    let metrics = Arc::new(MetricsRegistry::new());
    let dashboard_cache = DashboardCache::new(redis_client, config.cache_ttl.dashboard_seconds);
    let repo = Arc::new(PgDashboardRepository::new(db_pool));

    let dashboard_service = Arc::new(DashboardService::new(repo, dashboard_cache, metrics.clone()));

    let dashboard_service_data = web::Data::new(dashboard_service);
    let metrics_data = web::Data::new(metrics);

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    info!("dashboard-service listening on {}:{}", server_host, server_port);

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
            .app_data(dashboard_service_data.clone())
            .app_data(metrics_data.clone())
            .route("/health", web::get().to(health))
            .route("/metrics", web::get().to(metrics))
            .configure(rpc::configure)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
