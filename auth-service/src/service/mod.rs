//! The authentication core (C7).

pub mod auth_service;

pub use auth_service::AuthService;
