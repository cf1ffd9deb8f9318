//! RPC façade (C10), the unary HTTP+JSON request/reply boundary for
//! merchant-service (see card-service's `rpc::mod` for the rationale).

pub mod handlers;
pub mod routes;

pub use routes::configure;
