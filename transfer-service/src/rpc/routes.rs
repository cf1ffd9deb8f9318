//! Route table for the transfer-service façade.

use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/transfers")
            .route("", web::get().to(handlers::find_all))
            .route("", web::post().to(handlers::create))
            .route("/active", web::get().to(handlers::find_by_active))
            .route("/trashed", web::get().to(handlers::find_by_trashed))
            .route("/restore-all", web::post().to(handlers::restore_all))
            .route("/delete-all-permanent", web::post().to(handlers::delete_all_permanent))
            .route("/dashboard/total-amount", web::get().to(handlers::total_amount))
            .route("/dashboard/monthly-amount", web::get().to(handlers::monthly_amount))
            .route("/dashboard/yearly-amount", web::get().to(handlers::yearly_amount))
            .route("/number/{card_number}", web::get().to(handlers::find_by_card_number))
            .route("/number/{card_number}/sender/total-amount", web::get().to(handlers::total_amount_sender))
            .route("/number/{card_number}/sender/monthly-amount", web::get().to(handlers::monthly_amount_sender))
            .route("/number/{card_number}/sender/yearly-amount", web::get().to(handlers::yearly_amount_sender))
            .route("/number/{card_number}/receiver/total-amount", web::get().to(handlers::total_amount_receiver))
            .route("/number/{card_number}/receiver/monthly-amount", web::get().to(handlers::monthly_amount_receiver))
            .route("/number/{card_number}/receiver/yearly-amount", web::get().to(handlers::yearly_amount_receiver))
            .route("/{id}", web::get().to(handlers::find_by_id))
            .route("/{id}", web::put().to(handlers::update))
            .route("/{id}/status", web::put().to(handlers::update_status))
            .route("/{id}/trashed", web::post().to(handlers::trashed))
            .route("/{id}/restore", web::post().to(handlers::restore))
            .route("/{id}/permanent", web::delete().to(handlers::delete_permanent)),
    );
}
