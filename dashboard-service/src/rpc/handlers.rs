//! Actix-web handlers translating HTTP requests into `DashboardService`
//! calls and `ErrorResponse`/DTOs back into HTTP bodies.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use shared::errors::ErrorResponse;

use crate::service::DashboardService;

fn respond_error(err: ErrorResponse) -> HttpResponse {
    HttpResponse::build(
        actix_web::http::StatusCode::from_u16(err.code as u16)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
    )
    .json(err)
}

pub async fn get_dashboard(service: web::Data<Arc<DashboardService>>) -> HttpResponse {
    match service.get_dashboard().await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn get_dashboard_by_card_number(service: web::Data<Arc<DashboardService>>, path: web::Path<String>) -> HttpResponse {
    match service.get_dashboard_by_card_number(&path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}
