//! Forwards an inbound HTTP request to the upstream service that owns it.
//!
//! This is the entire "translate HTTP to RPC" job named in spec §1: every
//! domain service already speaks HTTP/JSON on its own façade (C10 in each
//! service crate), so the gateway's RPC leg is itself HTTP/JSON — it copies
//! method, path+query, body and headers through unchanged and relays the
//! upstream's status/body back. Non-goals (spec §1: "no on-wire bit layout
//! of the RPC protocol") mean no deeper negotiation is required here.

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use shared::errors::GatewayError;

const HOP_BY_HOP_REQUEST_HEADERS: &[header::HeaderName] = &[header::HOST, header::CONTENT_LENGTH];
const HOP_BY_HOP_RESPONSE_HEADERS: &[header::HeaderName] =
    &[header::CONTENT_LENGTH, header::TRANSFER_ENCODING, header::CONNECTION];

pub async fn forward(
    client: &reqwest::Client,
    base_url: &str,
    req: &HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.uri().path());
    let url = format!("{}{}", base_url.trim_end_matches('/'), path_and_query);

    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|e| GatewayError::InternalError { message: e.to_string() })?;

    let mut upstream_req = client.request(method, &url);
    for (name, value) in req.headers().iter() {
        if HOP_BY_HOP_REQUEST_HEADERS.contains(name) {
            continue;
        }
        if let Ok(value_str) = value.to_str() {
            upstream_req = upstream_req.header(name.as_str(), value_str);
        }
    }

    let upstream_resp = upstream_req.body(body.to_vec()).send().await.map_err(|e| {
        GatewayError::InternalError { message: format!("upstream request to {base_url} failed: {e}") }
    })?;

    let status = actix_web::http::StatusCode::from_u16(upstream_resp.status().as_u16())
        .unwrap_or(actix_web::http::StatusCode::BAD_GATEWAY);

    let mut client_resp = HttpResponse::build(status);
    for (name, value) in upstream_resp.headers().iter() {
        if HOP_BY_HOP_RESPONSE_HEADERS.iter().any(|h| h.as_str() == name.as_str()) {
            continue;
        }
        if let Ok(value_str) = value.to_str() {
            client_resp.insert_header((name.as_str(), value_str));
        }
    }

    let bytes = upstream_resp
        .bytes()
        .await
        .map_err(|e| GatewayError::InternalError { message: format!("failed reading upstream body: {e}") })?;

    Ok(client_resp.body(bytes))
}
