//! # Gateway Configuration
//!
//! The gateway is the one crate in the workspace that is not itself a
//! domain service — it only needs to know where the domain services live.
//! Loaded the same way as [`shared::config::AppConfig`] (`config` crate +
//! `dotenvy`, `APP_`-prefixed env vars with `__` nesting), but with its own
//! root shape: a `server` section plus one base URL per upstream service.
//! It also carries a `jwt` section — the same `JWT_SECRET` every domain
//! service is configured with — so the cross-cutting auth gate
//! ([`crate::auth_middleware`]) can validate tokens those services issued.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use shared::config::{AppEnvironment, JwtConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub service_name: String,
    pub environment: AppEnvironment,
    pub upstreams: UpstreamConfig,
    pub jwt: JwtConfig,
}

impl GatewayConfig {
    #[inline]
    pub fn is_production(&self) -> bool {
        self.environment == AppEnvironment::Production
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Base URL of each domain service's own HTTP façade. In docker-compose
/// these resolve to the service's container hostname; defaults here assume
/// that naming convention (`http://<service>:8080`).
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_auth_url")]
    pub auth_service_url: String,
    #[serde(default = "default_card_url")]
    pub card_service_url: String,
    #[serde(default = "default_merchant_url")]
    pub merchant_service_url: String,
    #[serde(default = "default_saldo_url")]
    pub saldo_service_url: String,
    #[serde(default = "default_topup_url")]
    pub topup_service_url: String,
    #[serde(default = "default_withdraw_url")]
    pub withdraw_service_url: String,
    #[serde(default = "default_transfer_url")]
    pub transfer_service_url: String,
    #[serde(default = "default_transaction_url")]
    pub transaction_service_url: String,
    #[serde(default = "default_dashboard_url")]
    pub dashboard_service_url: String,
}

impl GatewayConfig {
    /// Mirrors `AppConfig::from_env`: `.env` first, then `APP_*` env vars,
    /// then bare Docker-compatible overrides (`AUTH_SERVICE_URL`, etc.).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("service_name", "gateway")?
            .set_default("environment", "development")?
            .set_default("upstreams.auth_service_url", default_auth_url())?
            .set_default("upstreams.card_service_url", default_card_url())?
            .set_default("upstreams.merchant_service_url", default_merchant_url())?
            .set_default("upstreams.saldo_service_url", default_saldo_url())?
            .set_default("upstreams.topup_service_url", default_topup_url())?
            .set_default("upstreams.withdraw_service_url", default_withdraw_url())?
            .set_default("upstreams.transfer_service_url", default_transfer_url())?
            .set_default("upstreams.transaction_service_url", default_transaction_url())?
            .set_default("upstreams.dashboard_service_url", default_dashboard_url())?
            .set_default("jwt.access_token_ttl_seconds", 900)?
            .set_default("jwt.refresh_token_ttl_seconds", 604800)?
            .set_default("jwt.issuer", "payment-gateway")?
            .set_default("jwt.audience", "payment-gateway-api")?
            .add_source(Environment::with_prefix("APP").separator("__").try_parsing(true))
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("upstreams.auth_service_url", std::env::var("AUTH_SERVICE_URL").ok())?
            .set_override_option("upstreams.card_service_url", std::env::var("CARD_SERVICE_URL").ok())?
            .set_override_option("upstreams.merchant_service_url", std::env::var("MERCHANT_SERVICE_URL").ok())?
            .set_override_option("upstreams.saldo_service_url", std::env::var("SALDO_SERVICE_URL").ok())?
            .set_override_option("upstreams.topup_service_url", std::env::var("TOPUP_SERVICE_URL").ok())?
            .set_override_option("upstreams.withdraw_service_url", std::env::var("WITHDRAW_SERVICE_URL").ok())?
            .set_override_option("upstreams.transfer_service_url", std::env::var("TRANSFER_SERVICE_URL").ok())?
            .set_override_option("upstreams.transaction_service_url", std::env::var("TRANSACTION_SERVICE_URL").ok())?
            .set_override_option("upstreams.dashboard_service_url", std::env::var("DASHBOARD_SERVICE_URL").ok())?
            .set_override_option("service_name", std::env::var("SERVICE_NAME").ok())?
            .build()?;

        config.try_deserialize()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_auth_url() -> String {
    "http://auth-service:8080".to_string()
}

fn default_card_url() -> String {
    "http://card-service:8080".to_string()
}

fn default_merchant_url() -> String {
    "http://merchant-service:8080".to_string()
}

fn default_saldo_url() -> String {
    "http://saldo-service:8080".to_string()
}

fn default_topup_url() -> String {
    "http://topup-service:8080".to_string()
}

fn default_withdraw_url() -> String {
    "http://withdraw-service:8080".to_string()
}

fn default_transfer_url() -> String {
    "http://transfer-service:8080".to_string()
}

fn default_transaction_url() -> String {
    "http://transaction-service:8080".to_string()
}

fn default_dashboard_url() -> String {
    "http://dashboard-service:8080".to_string()
}
