//! Route table for the merchant-service façade.

use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/merchants")
            .route("", web::get().to(handlers::find_all))
            .route("", web::post().to(handlers::create))
            .route("/active", web::get().to(handlers::find_by_active))
            .route("/trashed", web::get().to(handlers::find_by_trashed))
            .route("/restore-all", web::post().to(handlers::restore_all))
            .route("/delete-all-permanent", web::post().to(handlers::delete_all_permanent))
            .route("/dashboard/total-amount", web::get().to(handlers::total_amount))
            .route("/dashboard/monthly-amount", web::get().to(handlers::monthly_amount))
            .route("/dashboard/yearly-amount", web::get().to(handlers::yearly_amount))
            .route("/dashboard/monthly-payment-method", web::get().to(handlers::monthly_payment_method))
            .route("/dashboard/yearly-payment-method", web::get().to(handlers::yearly_payment_method))
            .route("/user/{user_id}", web::get().to(handlers::find_by_user_id))
            .route("/apikey/{api_key}", web::get().to(handlers::find_by_api_key))
            .route("/apikey/{api_key}/total-amount", web::get().to(handlers::total_amount_by_apikey))
            .route("/apikey/{api_key}/monthly-amount", web::get().to(handlers::monthly_amount_by_apikey))
            .route("/apikey/{api_key}/yearly-amount", web::get().to(handlers::yearly_amount_by_apikey))
            .route("/apikey/{api_key}/monthly-payment-method", web::get().to(handlers::monthly_payment_method_by_apikey))
            .route("/apikey/{api_key}/yearly-payment-method", web::get().to(handlers::yearly_payment_method_by_apikey))
            .route("/{id}", web::get().to(handlers::find_by_id))
            .route("/{id}", web::put().to(handlers::update))
            .route("/{id}/status", web::patch().to(handlers::update_status))
            .route("/{id}/trashed", web::post().to(handlers::trashed))
            .route("/{id}/restore", web::post().to(handlers::restore))
            .route("/{id}/permanent", web::delete().to(handlers::delete_permanent))
            .route("/{id}/total-amount", web::get().to(handlers::total_amount_by_merchant))
            .route("/{id}/monthly-amount", web::get().to(handlers::monthly_amount_by_merchant))
            .route("/{id}/yearly-amount", web::get().to(handlers::yearly_amount_by_merchant))
            .route("/{id}/monthly-payment-method", web::get().to(handlers::monthly_payment_method_by_merchant))
            .route("/{id}/yearly-payment-method", web::get().to(handlers::yearly_payment_method_by_merchant)),
    );
}
