//! Route table for the gateway (C10): one scope per upstream service,
//! each forwarding everything beneath its prefix to that service's own
//! HTTP façade. The prefixes match the `/api/v1/...` scopes each service
//! already registers on itself (see e.g. `topup-service/src/rpc/routes.rs`).

use actix_web::web;

use crate::config::UpstreamConfig;
use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig, upstreams: &UpstreamConfig) {
    let scopes: &[(&str, &str)] = &[
        ("/api/v1/auth", &upstreams.auth_service_url),
        ("/api/v1/cards", &upstreams.card_service_url),
        ("/api/v1/merchants", &upstreams.merchant_service_url),
        ("/api/v1/saldos", &upstreams.saldo_service_url),
        ("/api/v1/topups", &upstreams.topup_service_url),
        ("/api/v1/withdraws", &upstreams.withdraw_service_url),
        ("/api/v1/transfers", &upstreams.transfer_service_url),
        ("/api/v1/transactions", &upstreams.transaction_service_url),
        ("/api/v1/dashboard", &upstreams.dashboard_service_url),
    ];

    for (prefix, base_url) in scopes {
        cfg.service(
            web::scope(prefix)
                .app_data(web::Data::new(base_url.to_string()))
                .default_service(web::to(handlers::proxy)),
        );
    }
}
