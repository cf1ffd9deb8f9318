//! Actix-web handlers translating HTTP+JSON requests into `SaldoService`
//! calls and `ErrorResponse`/DTOs back into HTTP bodies.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared::errors::{validation_error_response, ErrorResponse};
use uuid::Uuid;
use validator::Validate;

use crate::domain::dto::{CreateSaldoRequest, FindAllRequest, UpdateSaldoRequest};
use crate::domain::entities::{NewSaldo, UpdateSaldo};
use crate::service::SaldoService;

fn respond_error(err: ErrorResponse) -> HttpResponse {
    HttpResponse::build(
        actix_web::http::StatusCode::from_u16(err.code as u16)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
    )
    .json(err)
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: i32,
}

pub async fn find_all(service: web::Data<Arc<SaldoService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_all(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_active(service: web::Data<Arc<SaldoService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_by_active(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_trashed(service: web::Data<Arc<SaldoService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_by_trashed(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_id(service: web::Data<Arc<SaldoService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.find_by_id(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_card_number(service: web::Data<Arc<SaldoService>>, path: web::Path<String>) -> HttpResponse {
    match service.find_by_card_number(&path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn create(service: web::Data<Arc<SaldoService>>, body: web::Json<CreateSaldoRequest>) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return respond_error(validation_error_response(&errors));
    }
    let new_saldo = NewSaldo { card_number: body.card_number.clone(), total_balance: body.total_balance };
    match service.create(new_saldo).await {
        Ok(resp) => HttpResponse::Created().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn update(service: web::Data<Arc<SaldoService>>, path: web::Path<Uuid>, body: web::Json<UpdateSaldoRequest>) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return respond_error(validation_error_response(&errors));
    }
    let update = UpdateSaldo { total_balance: body.total_balance };
    match service.update(path.into_inner(), update).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn trashed(service: web::Data<Arc<SaldoService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.trashed(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn restore(service: web::Data<Arc<SaldoService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.restore(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn delete_permanent(service: web::Data<Arc<SaldoService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.delete_permanent(path.into_inner()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => respond_error(err),
    }
}

pub async fn restore_all(service: web::Data<Arc<SaldoService>>) -> HttpResponse {
    match service.restore_all().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn delete_all_permanent(service: web::Data<Arc<SaldoService>>) -> HttpResponse {
    match service.delete_all_permanent().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_balance(service: web::Data<Arc<SaldoService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_balance(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_balance(service: web::Data<Arc<SaldoService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_balance(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_balance_by_card_number(
    service: web::Data<Arc<SaldoService>>,
    path: web::Path<String>,
    query: web::Query<YearQuery>,
) -> HttpResponse {
    match service.get_monthly_balance_by_card_number(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_balance_by_card_number(
    service: web::Data<Arc<SaldoService>>,
    path: web::Path<String>,
    query: web::Query<YearQuery>,
) -> HttpResponse {
    match service.get_yearly_balance_by_card_number(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn total_balance(service: web::Data<Arc<SaldoService>>) -> HttpResponse {
    match service.get_total_balance().await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({"total_balance": total})),
        Err(err) => respond_error(err),
    }
}

pub async fn total_balance_by_card_number(service: web::Data<Arc<SaldoService>>, path: web::Path<String>) -> HttpResponse {
    match service.get_total_balance_by_card_number(&path).await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({"total_balance": total})),
        Err(err) => respond_error(err),
    }
}
