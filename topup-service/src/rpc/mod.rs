//! HTTP façade (C10) for topup-service. JSON over actix-web, the same
//! wire shape as every other service; the wire protocol itself is out of
//! scope, so this favors the teacher's existing actix-web convention over
//! introducing a second RPC stack.

pub mod handlers;
pub mod routes;

pub use routes::configure;
