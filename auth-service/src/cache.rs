//! Domain-typed cache wrapper for the auth service (C3), built over
//! `shared::cache::TypedCache`. Three fixed TTLs per spec §3.2: the
//! verification code (15 min), the reset token (5 min), and the login
//! session (1 min).

use shared::cache::{InMemoryStore, TypedCache, LOGIN_SESSION_TTL, RESET_TOKEN_TTL, VERIFICATION_CODE_TTL};
use shared::redis_client::RedisClient;
use uuid::Uuid;

use crate::domain::dto::TokenResponse;

#[derive(Clone)]
pub struct AuthCache {
    verification: TypedCache,
    reset_token: TypedCache,
    login_session: TypedCache,
}

impl AuthCache {
    pub fn new(client: RedisClient) -> Self {
        Self {
            verification: TypedCache::new(client.clone(), "auth:verification_code"),
            reset_token: TypedCache::new(client.clone(), "auth:reset_token"),
            login_session: TypedCache::new(client, "auth:login_session"),
        }
    }

    /// Test-only constructor over an in-memory [`KvStore`](shared::cache::KvStore)
    /// so service tests can seed/inspect cache state without a live Redis.
    pub fn with_store(store: InMemoryStore) -> Self {
        Self {
            verification: TypedCache::new(store.clone(), "auth:verification_code"),
            reset_token: TypedCache::new(store.clone(), "auth:reset_token"),
            login_session: TypedCache::new(store, "auth:login_session"),
        }
    }

    /// `email -> verification_code`, written after Register (spec §4.7.1
    /// step 9), invalidated after VerifyCode (spec §4.7.6 step 3).
    pub async fn set_verification_code(&self, email: &str, code: &str) {
        self.verification.set(email, &code.to_string(), VERIFICATION_CODE_TTL).await;
    }

    pub async fn delete_verification_code(&self, email: &str) {
        self.verification.delete(email).await;
    }

    /// `reset_token -> user_id`, written by ForgotPassword (spec §4.7.4
    /// step 4) and opportunistically by ResetPassword's cache-miss fallback
    /// (spec §4.7.5 step 1).
    pub async fn get_reset_token_user(&self, token: &str) -> Option<Uuid> {
        self.reset_token.get(token).await
    }

    pub async fn set_reset_token_user(&self, token: &str, user_id: Uuid) {
        self.reset_token.set(token, &user_id, RESET_TOKEN_TTL).await;
    }

    pub async fn delete_reset_token(&self, token: &str) {
        self.reset_token.delete(token).await;
    }

    /// `email -> TokenResponse`, spec §4.7.2 steps 1 and 6.
    pub async fn get_login_session(&self, email: &str) -> Option<TokenResponse> {
        self.login_session.get(email).await
    }

    pub async fn set_login_session(&self, email: &str, tokens: &TokenResponse) {
        self.login_session.set(email, tokens, LOGIN_SESSION_TTL).await;
    }

    pub async fn delete_login_session(&self, email: &str) {
        self.login_session.delete(email).await;
    }
}
