//! # Authentication primitives
//!
//! JWT issuance/validation, Argon2id password hashing, and the gateway's
//! HTTP-layer extraction glue. These are the crypto/token building blocks
//! `auth-service` composes into the registration/login/refresh/reset flow
//! specified in full by spec §4.7; this module only provides the
//! primitives, not that flow.
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`JwtService`] | Generate and validate access/refresh tokens |
//! | [`PasswordHasher`] | Argon2id password hashing |
//! | [`AuthMiddleware`] | Gateway-side bearer-token extraction |
//! | [`AuthenticatedUser`] | Extractor for the gateway's protected routes |

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, TokenPair};
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use password::PasswordHasher;
