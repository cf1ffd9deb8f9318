//! Route table for the card-service façade.

use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/cards")
            .route("", web::get().to(handlers::find_all))
            .route("", web::post().to(handlers::create))
            .route("/active", web::get().to(handlers::find_by_active))
            .route("/trashed", web::get().to(handlers::find_by_trashed))
            .route("/restore-all", web::post().to(handlers::restore_all))
            .route("/delete-all-permanent", web::post().to(handlers::delete_all_permanent))
            .route("/dashboard/total-balance", web::get().to(handlers::total_balance))
            .route("/dashboard/monthly-balance", web::get().to(handlers::monthly_balance))
            .route("/dashboard/yearly-balance", web::get().to(handlers::yearly_balance))
            .route("/user/{user_id}", web::get().to(handlers::find_by_user_id))
            .route("/number/{card_number}", web::get().to(handlers::find_by_card_number))
            .route("/number/{card_number}/total-balance", web::get().to(handlers::total_balance_by_card_number))
            .route("/number/{card_number}/monthly-balance", web::get().to(handlers::monthly_balance_by_card_number))
            .route("/number/{card_number}/yearly-balance", web::get().to(handlers::yearly_balance_by_card_number))
            .route("/{id}", web::get().to(handlers::find_by_id))
            .route("/{id}", web::put().to(handlers::update))
            .route("/{id}/status", web::patch().to(handlers::update_status))
            .route("/{id}/trashed", web::post().to(handlers::trashed))
            .route("/{id}/restore", web::post().to(handlers::restore))
            .route("/{id}/permanent", web::delete().to(handlers::delete_permanent)),
    );
}
