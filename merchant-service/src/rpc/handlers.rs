//! Actix-web handlers translating HTTP+JSON requests into `MerchantService`
//! calls and `ErrorResponse`/DTOs back into HTTP bodies.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared::errors::{validation_error_response, ErrorResponse};
use uuid::Uuid;
use validator::Validate;

use crate::domain::dto::{CreateMerchantRequest, FindAllRequest, UpdateMerchantRequest, UpdateStatusRequest};
use crate::domain::entities::{NewMerchant, UpdateMerchant};
use crate::service::MerchantService;

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

pub async fn find_all(service: web::Data<Arc<MerchantService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_all(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_active(service: web::Data<Arc<MerchantService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_by_active(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_trashed(service: web::Data<Arc<MerchantService>>, query: web::Query<FindAllRequest>) -> HttpResponse {
    match service.find_by_trashed(&query).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_id(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.find_by_id(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_user_id(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.find_by_user_id(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn find_by_api_key(service: web::Data<Arc<MerchantService>>, path: web::Path<String>) -> HttpResponse {
    match service.find_by_api_key(&path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn create(service: web::Data<Arc<MerchantService>>, body: web::Json<CreateMerchantRequest>) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return respond_error(validation_error_response(&errors));
    }
    let api_key = uuid::Uuid::new_v4().simple().to_string();
    let new_merchant = NewMerchant {
        name: body.name.clone(),
        user_id: body.user_id,
        api_key,
    };
    match service.create(new_merchant).await {
        Ok(resp) => HttpResponse::Created().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn update(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>, body: web::Json<UpdateMerchantRequest>) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return respond_error(validation_error_response(&errors));
    }
    let update = UpdateMerchant { name: body.name.clone() };
    match service.update(path.into_inner(), update).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn update_status(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>, body: web::Json<UpdateStatusRequest>) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return respond_error(validation_error_response(&errors));
    }
    match service.update_status(path.into_inner(), &body.status).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn trashed(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.trashed(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn restore(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.restore(path.into_inner()).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn delete_permanent(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>) -> HttpResponse {
    match service.delete_permanent(path.into_inner()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => respond_error(err),
    }
}

pub async fn restore_all(service: web::Data<Arc<MerchantService>>) -> HttpResponse {
    match service.restore_all().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn delete_all_permanent(service: web::Data<Arc<MerchantService>>) -> HttpResponse {
    match service.delete_all_permanent().await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({"status": "ok"})),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_amount(service: web::Data<Arc<MerchantService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_amount(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_amount(service: web::Data<Arc<MerchantService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_amount(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_amount_by_merchant(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_amount_by_merchant(path.into_inner(), query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_amount_by_merchant(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_amount_by_merchant(path.into_inner(), query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_amount_by_apikey(service: web::Data<Arc<MerchantService>>, path: web::Path<String>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_amount_by_apikey(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_amount_by_apikey(service: web::Data<Arc<MerchantService>>, path: web::Path<String>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_amount_by_apikey(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_payment_method(service: web::Data<Arc<MerchantService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_payment_method(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_payment_method(service: web::Data<Arc<MerchantService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_payment_method(query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_payment_method_by_merchant(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_payment_method_by_merchant(path.into_inner(), query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_payment_method_by_merchant(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_payment_method_by_merchant(path.into_inner(), query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn monthly_payment_method_by_apikey(service: web::Data<Arc<MerchantService>>, path: web::Path<String>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_monthly_payment_method_by_apikey(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn yearly_payment_method_by_apikey(service: web::Data<Arc<MerchantService>>, path: web::Path<String>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_yearly_payment_method_by_apikey(&path, query.year).await {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => respond_error(err),
    }
}

pub async fn total_amount(service: web::Data<Arc<MerchantService>>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_total_amount(query.year).await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({"total_amount": total})),
        Err(err) => respond_error(err),
    }
}

pub async fn total_amount_by_merchant(service: web::Data<Arc<MerchantService>>, path: web::Path<Uuid>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_total_amount_by_merchant(path.into_inner(), query.year).await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({"total_amount": total})),
        Err(err) => respond_error(err),
    }
}

pub async fn total_amount_by_apikey(service: web::Data<Arc<MerchantService>>, path: web::Path<String>, query: web::Query<YearQuery>) -> HttpResponse {
    match service.get_total_amount_by_apikey(&path, query.year).await {
        Ok(total) => HttpResponse::Ok().json(serde_json::json!({"total_amount": total})),
        Err(err) => respond_error(err),
    }
}
