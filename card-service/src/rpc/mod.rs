//! RPC façade (C10). Implemented as actix-web JSON request/reply handlers
//! rather than a generated protobuf/tonic stub: spec §1 treats the wire
//! protocol as "opaque unary request/reply" and explicitly keeps codegen
//! out of scope, so this façade is the unary request/reply boundary the
//! spec names without fabricating a codegen pipeline.

pub mod handlers;
pub mod routes;

pub use routes::configure;
