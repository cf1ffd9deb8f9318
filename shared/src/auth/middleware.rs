//! # Authentication middleware for Actix-web
//!
//! Extracts and validates JWT access tokens from HTTP requests. Trimmed, per
//! `SPEC_FULL.md` §2.7, to the extraction/extractor parts the gateway's
//! out-of-scope HTTP glue needs: the domain's `Role`/`UserRole` are dynamic,
//! DB-backed name associations (spec §3.1), not a fixed hierarchy, so the
//! teacher's `UserRole` enum and `RequireRole` guards are dropped rather
//! than repurposed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let jwt_service = Arc::new(JwtService::new(config.jwt));
//! let auth = AuthMiddleware::new(jwt_service);
//! auth.authenticate(&req)?; // stores AuthenticatedUser in request extensions
//! ```

use crate::auth::jwt::{Claims, JwtService};
use crate::errors::GatewayError;
use actix_web::{dev::ServiceRequest, Error, HttpMessage};
use std::sync::Arc;
use uuid::Uuid;

/// The authenticated caller, extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    /// Role name as carried in the token's `role` claim; resolved against
    /// the domain's dynamic Role table, not a fixed enum.
    pub role: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// JWT-based authentication: extracts the bearer token, validates it, and
/// stores the resulting `AuthenticatedUser` in request extensions.
#[derive(Clone)]
pub struct AuthMiddleware {
    jwt_service: Arc<JwtService>,
}

impl AuthMiddleware {
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }

    pub fn extract_user(&self, req: &ServiceRequest) -> Result<AuthenticatedUser, GatewayError> {
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or(GatewayError::MissingAuth)?;

        let token = JwtService::extract_from_header(auth_header)?;
        let claims = self.jwt_service.validate_access_token(token)?;

        Ok(AuthenticatedUser::from(claims))
    }

    pub fn authenticate(&self, req: &ServiceRequest) -> Result<(), GatewayError> {
        let user = self.extract_user(req)?;
        req.extensions_mut().insert(user);
        Ok(())
    }
}

/// Extractor: add `AuthenticatedUser` as a handler parameter to require a
/// prior `AuthMiddleware::authenticate` call on the same request.
impl actix_web::FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| GatewayError::MissingAuth.into());

        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_carries_role_claim_verbatim() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role: "merchant_admin".to_string(),
            iss: "test".to_string(),
            aud: "test".to_string(),
            exp: 0,
            iat: 0,
            jti: Uuid::new_v4(),
            token_type: crate::auth::jwt::TokenType::Access,
        };

        let user = AuthenticatedUser::from(claims.clone());

        assert_eq!(user.user_id, claims.sub);
        assert_eq!(user.role, "merchant_admin");
    }
}
