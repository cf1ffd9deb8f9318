//! Actix-web handlers translating HTTP+JSON requests into
//! `TransactionService` calls and `ErrorResponse`/DTOs back into HTTP
//! bodies.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared::errors::ErrorResponse;
use uuid::Uuid;

use crate::domain::dto::{CreateTransactionRequest, FindAllRequest, UpdateStatusRequest, UpdateTransactionRequest};
use crate::domain::entities::{NewTransaction, UpdateTransaction};
use crate::service::TransactionService;

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

pub async fn find_all(service: web::Data<Arc<TransactionService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_all(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_active(service: web::Data<Arc<TransactionService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_by_active(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_trashed(service: web::Data<Arc<TransactionService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_by_trashed(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_id(service: web::Data<Arc<TransactionService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.find_by_id(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_card_number(service: web::Data<Arc<TransactionService>>, path: web::Path<String>) -> HttpResponse {
    match service.find_by_card_number(&path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn create(service: web::Data<Arc<TransactionService>>, body: web::Json<CreateTransactionRequest>) -> HttpResponse {
    let new_transaction = NewTransaction {
        card_number: body.card_number.clone(),
        transaction_amount: body.transaction_amount,
        transaction_method: body.transaction_method.clone(),
    };
    match service.create(new_transaction).await {
        Ok(resp) => HttpResponse::Created().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn update(service: web::Data<Arc<TransactionService>>, path: web::Path<Uuid>, body: web::Json<UpdateTransactionRequest>) -> HttpResponse {
    let update = UpdateTransaction { transaction_amount: body.transaction_amount, transaction_method: body.transaction_method.clone() };
    match service.update(path.into_inner(), update).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn update_status(service: web::Data<Arc<TransactionService>>, path: web::Path<Uuid>, body: web::Json<UpdateStatusRequest>) -> HttpResponse {
    match service.update_status(path.into_inner(), &body.status).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn trashed(service: web::Data<Arc<TransactionService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.trashed(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn restore(service: web::Data<Arc<TransactionService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.restore(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn delete_permanent(service: web::Data<Arc<TransactionService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.delete_permanent(path.into_inner()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => respond_error(err),
    }
}

pub async fn restore_all(service: web::Data<Arc<TransactionService>>) -> HttpResponse {
    match service.restore_all().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn delete_all_permanent(service: web::Data<Arc<TransactionService>>) -> HttpResponse {
    match service.delete_all_permanent().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_amount(service: web::Data<Arc<TransactionService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_amount(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_amount(service: web::Data<Arc<TransactionService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_amount(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_amount_by_card_number(
    service: web::Data<Arc<TransactionService>>,
    path: web::Path<String>,
    query: web::Query<YearQuery>,
) -> HttpResponse {
    match service.get_monthly_amount_by_card_number(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_amount_by_card_number(
    service: web::Data<Arc<TransactionService>>,
    path: web::Path<String>,
    query: web::Query<YearQuery>,
) -> HttpResponse {
    match service.get_yearly_amount_by_card_number(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn total_amount(service: web::Data<Arc<TransactionService>>) -> HttpResponse {
    match service.get_total_amount().await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({"total_amount": total})),
        Err(err) => respond_error(err),
    }
}

pub async fn total_amount_by_card_number(service: web::Data<Arc<TransactionService>>, path: web::Path<String>) -> HttpResponse {
    match service.get_total_amount_by_card_number(&path).await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({"total_amount": total})),
        Err(err) => respond_error(err),
    }
}
