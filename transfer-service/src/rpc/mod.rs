//! HTTP façade (C10) for transfer-service. JSON over actix-web, the same
//! wire shape as every other service.

pub mod handlers;
pub mod routes;

pub use routes::configure;
