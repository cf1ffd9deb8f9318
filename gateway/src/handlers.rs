//! Generic proxy handler shared by every upstream scope (see `routes.rs`):
//! each scope supplies its own upstream base URL via `app_data`, and the
//! handler itself only knows how to forward, never which service it is
//! forwarding to.

use actix_web::{web, HttpRequest, HttpResponse};
use shared::errors::GatewayError;

pub async fn proxy(
    upstream_base_url: web::Data<String>,
    client: web::Data<reqwest::Client>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    crate::proxy::forward(&client, &upstream_base_url, &req, body).await
}
