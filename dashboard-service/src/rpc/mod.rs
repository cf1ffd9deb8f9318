//! HTTP façade (C10) for dashboard-service. Read-only: the aggregator
//! never mutates state, so its route table is just the two composite
//! lookups named in spec §4.8.

pub mod handlers;
pub mod routes;

pub use routes::configure;
