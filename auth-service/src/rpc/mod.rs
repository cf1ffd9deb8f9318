//! RPC façade (C10): opaque HTTP+JSON unary request/reply surface over the
//! `AuthService` core, per the §9 resolution ("no protobuf codegen in
//! scope — expose the same request/reply shapes over actix-web JSON
//! endpoints instead of inventing a wire format").

pub mod handlers;
pub mod routes;

pub use routes::configure;
