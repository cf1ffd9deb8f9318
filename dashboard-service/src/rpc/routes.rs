//! Route table for the dashboard-service façade.

use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .route("", web::get().to(handlers::get_dashboard))
            .route("/number/{card_number}", web::get().to(handlers::get_dashboard_by_card_number)),
    );
}
