//! Authentication core (C7): registration, login, refresh-token rotation,
//! password reset, and email verification. Every public method follows the
//! service-method recipe in spec §4.6 exactly.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use shared::auth::{JwtService, PasswordHasher};
use shared::envelope::Envelope;
use shared::errors::{ErrorKind, ErrorResponse, PasswordOpFailure, TokenFailure};
use shared::events::Publisher;
use shared::telemetry::MetricsRegistry;
use uuid::Uuid;

use crate::cache::AuthCache;
use crate::domain::dto::{TokenResponse, UserResponse};
use crate::domain::entities::{NewUser, RefreshToken, ResetToken};
use crate::domain::events::{reset_password_email, verify_code_success_body, welcome_email, TOPIC_FORGOT_PASSWORD, TOPIC_REGISTER, TOPIC_VERIFY_CODE_SUCCESS};
use crate::domain::mapper::{to_token_response, to_user_response};
use crate::errors::{refresh_token_errors, reset_token_errors, role_errors, user_errors};
use crate::repository::{RefreshTokenRepository, ResetTokenRepository, RoleRepository, UserRepository, UserRoleRepository};
use crate::util::generate_random_string;

const REFRESH_TOKEN_TTL_HOURS: i64 = 24;
const RESET_TOKEN_TTL_HOURS: i64 = 24;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
    refresh_tokens: Arc<dyn RefreshTokenRepository>,
    reset_tokens: Arc<dyn ResetTokenRepository>,
    cache: AuthCache,
    publisher: Arc<dyn Publisher>,
    password_hasher: Arc<PasswordHasher>,
    jwt: Arc<JwtService>,
    metrics: Arc<MetricsRegistry>,
    default_role_name: String,
}

impl AuthService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        user_roles: Arc<dyn UserRoleRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        reset_tokens: Arc<dyn ResetTokenRepository>,
        cache: AuthCache,
        publisher: Arc<dyn Publisher>,
        password_hasher: Arc<PasswordHasher>,
        jwt: Arc<JwtService>,
        metrics: Arc<MetricsRegistry>,
        default_role_name: String,
    ) -> Self {
        Self {
            users,
            roles,
            user_roles,
            refresh_tokens,
            reset_tokens,
            cache,
            publisher,
            password_hasher,
            jwt,
            metrics,
            default_role_name,
        }
    }

    /// §4.7.1 Register.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<UserResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Register", &[("email", email)]);

        match self.users.find_by_email(email).await {
            Ok(Some(_)) => {
                return Err(envelope.fail(ErrorKind::NotFound, "email already registered", user_errors::err_user_already_exists()));
            }
            Ok(None) => {}
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_failed_create_user()));
            }
        }

        let password_hash = match self.password_hasher.hash(password) {
            Ok(h) => h,
            Err(e) => {
                return Err(envelope.fail(
                    ErrorKind::PasswordOp(PasswordOpFailure::Hash),
                    &e.to_string(),
                    user_errors::err_failed_create_user(),
                ));
            }
        };

        let default_role = match self.roles.find_by_name(&self.default_role_name).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                return Err(envelope.fail(ErrorKind::NotFound, "default role missing", role_errors::err_role_not_found()));
            }
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), role_errors::err_role_not_found()));
            }
        };

        let verification_code = match generate_random_string(10) {
            Ok(code) => code,
            Err(_) => {
                return Err(envelope.fail(ErrorKind::RandomString, "rng failure", user_errors::err_failed_create_user()));
            }
        };

        let new_user = NewUser {
            email: email.to_string(),
            password_hash,
            verification_code: verification_code.clone(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };

        let user = match self.users.create(new_user).await {
            Ok(u) => u,
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_failed_create_user()));
            }
        };

        let email_payload = welcome_email(&user.email, &verification_code);
        let payload_json = match serde_json::to_value(&email_payload) {
            Ok(v) => v,
            Err(e) => {
                return Err(envelope.fail(ErrorKind::JsonMarshal, &e.to_string(), user_errors::err_failed_create_user()));
            }
        };

        if let Err(e) = self.publisher.publish(TOPIC_REGISTER, &user.id.to_string(), &payload_json).await {
            return Err(envelope.fail(ErrorKind::Publisher, &e, user_errors::err_failed_create_user()));
        }

        // Ordering constraint (spec §4.7.1): publish happens after create,
        // before role-assign. A role-assign failure here leaves an orphan
        // user with no role — permitted, reconcilable by a retry (§9).
        if let Err(e) = self.user_roles.assign(user.id, default_role.id).await {
            return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), role_errors::err_failed_assign_role()));
        }

        self.cache.set_verification_code(&user.email, &verification_code).await;

        envelope.success("user registered", &[("user_id", &user.id.to_string())]);
        Ok(to_user_response(&user))
    }

    /// §4.7.2 Login.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "Login", &[("email", email)]);

        if let Some(cached) = self.cache.get_login_session(email).await {
            envelope.success("cache hit", &[]);
            return Ok(cached);
        }

        let user = match self.users.find_by_email(email).await {
            Ok(Some(u)) if u.verified => u,
            Ok(Some(_)) => {
                return Err(envelope.fail(ErrorKind::NotFound, "account not verified", user_errors::err_not_verified()));
            }
            Ok(None) => {
                return Err(envelope.fail(ErrorKind::NotFound, "no such user", user_errors::err_user_not_found()));
            }
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_user_not_found()));
            }
        };

        match self.password_hasher.verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                return Err(envelope.fail(
                    ErrorKind::PasswordOp(PasswordOpFailure::Compare),
                    "password mismatch",
                    user_errors::err_invalid_credentials(),
                ));
            }
            Err(e) => {
                return Err(envelope.fail(
                    ErrorKind::PasswordOp(PasswordOpFailure::Compare),
                    &e.to_string(),
                    user_errors::err_invalid_credentials(),
                ));
            }
        }

        let tokens = match self.issue_token_pair(&mut envelope, user.id, &user.email, &self.default_role_name).await {
            Ok(t) => t,
            Err(e) => return Err(e),
        };

        self.cache.set_login_session(email, &tokens).await;
        envelope.success("login succeeded", &[("user_id", &user.id.to_string())]);
        Ok(tokens)
    }

    /// §4.7.3 Refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "RefreshToken", &[]);

        let claims = match self.jwt.validate_refresh_token(refresh_token) {
            Ok(c) => c,
            Err(_) => {
                return Err(envelope.fail(ErrorKind::Token(TokenFailure::Invalid), "decode failed", refresh_token_errors::err_invalid_token()));
            }
        };

        let stored = match self.refresh_tokens.find_by_token(refresh_token).await {
            Ok(Some(t)) => t,
            Ok(None) => {
                return Err(envelope.fail(ErrorKind::Token(TokenFailure::Invalid), "token not found", refresh_token_errors::err_invalid_token()));
            }
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), refresh_token_errors::err_invalid_token()));
            }
        };

        if stored.expires_at < Utc::now() {
            return Err(envelope.fail(ErrorKind::Token(TokenFailure::Expired), "token expired", refresh_token_errors::err_expired_token()));
        }

        if let Err(e) = self.refresh_tokens.delete_for_user(claims.sub).await {
            return Err(envelope.fail(ErrorKind::Token(TokenFailure::Delete), &e.to_string(), refresh_token_errors::err_failed_rotate_token()));
        }

        let tokens = self
            .issue_token_pair(&mut envelope, claims.sub, &claims.email, &claims.role)
            .await?;

        envelope.success("refresh succeeded", &[("user_id", &claims.sub.to_string())]);
        Ok(tokens)
    }

    /// Shared tail of Login step 4-5 and Refresh step 4 (spec §4.7.2 /
    /// §4.7.3): mint access+refresh, delete-then-create the stored refresh
    /// token (create-after-delete, tolerant of "no rows").
    async fn issue_token_pair(
        &self,
        envelope: &mut Envelope<'_>,
        user_id: Uuid,
        email: &str,
        role: &str,
    ) -> Result<TokenResponse, ErrorResponse> {
        let pair = match self.jwt.generate_tokens(user_id, email, role) {
            Ok(p) => p,
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Token(TokenFailure::Invalid), &e.to_string(), refresh_token_errors::err_failed_rotate_token()));
            }
        };

        if let Err(e) = self.refresh_tokens.delete_for_user(user_id).await {
            return Err(envelope.fail(ErrorKind::Token(TokenFailure::Delete), &e.to_string(), refresh_token_errors::err_failed_rotate_token()));
        }

        let record = RefreshToken {
            user_id,
            token: pair.refresh_token.clone(),
            expires_at: Utc::now() + Duration::hours(REFRESH_TOKEN_TTL_HOURS),
        };
        if let Err(e) = self.refresh_tokens.create(&record).await {
            return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), refresh_token_errors::err_failed_rotate_token()));
        }

        Ok(to_token_response(pair.access_token, pair.refresh_token))
    }

    /// §4.7.4 ForgotPassword.
    pub async fn forgot_password(&self, email: &str) -> Result<bool, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "ForgotPassword", &[("email", email)]);

        let user = match self.users.find_by_email(email).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                return Err(envelope.fail(ErrorKind::NotFound, "no such user", user_errors::err_user_not_found()));
            }
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_user_not_found()));
            }
        };

        let token = match generate_random_string(10) {
            Ok(t) => t,
            Err(_) => {
                return Err(envelope.fail(ErrorKind::RandomString, "rng failure", reset_token_errors::err_failed_create_reset_token()));
            }
        };

        let record = ResetToken {
            user_id: user.id,
            token: token.clone(),
            expires_at: Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS),
        };
        if let Err(e) = self.reset_tokens.create(&record).await {
            return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), reset_token_errors::err_failed_create_reset_token()));
        }

        self.cache.set_reset_token_user(&token, user.id).await;

        let email_payload = reset_password_email(&user.email, &token);
        let payload_json = match serde_json::to_value(&email_payload) {
            Ok(v) => v,
            Err(e) => {
                return Err(envelope.fail(ErrorKind::JsonMarshal, &e.to_string(), reset_token_errors::err_failed_create_reset_token()));
            }
        };
        if let Err(e) = self.publisher.publish(TOPIC_FORGOT_PASSWORD, &user.id.to_string(), &payload_json).await {
            return Err(envelope.fail(ErrorKind::Publisher, &e, reset_token_errors::err_failed_create_reset_token()));
        }

        envelope.success("reset email dispatched", &[("user_id", &user.id.to_string())]);
        Ok(true)
    }

    /// §4.7.5 ResetPassword.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<bool, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "ResetPassword", &[]);

        let user_id = match self.cache.get_reset_token_user(reset_token).await {
            Some(id) => id,
            None => match self.reset_tokens.find_by_token(reset_token).await {
                Ok(Some(row)) if row.expires_at >= Utc::now() => {
                    self.cache.set_reset_token_user(reset_token, row.user_id).await;
                    row.user_id
                }
                Ok(_) => {
                    return Err(envelope.fail(ErrorKind::NotFound, "reset token missing or expired", reset_token_errors::err_invalid_reset_token()));
                }
                Err(e) => {
                    return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), reset_token_errors::err_invalid_reset_token()));
                }
            },
        };

        if password != confirm_password {
            return Err(envelope.fail(
                ErrorKind::PasswordOp(PasswordOpFailure::NotMatch),
                "password/confirmation mismatch",
                user_errors::err_password_mismatch(),
            ));
        }

        let password_hash = match self.password_hasher.hash(password) {
            Ok(h) => h,
            Err(e) => {
                return Err(envelope.fail(ErrorKind::PasswordOp(PasswordOpFailure::Hash), &e.to_string(), user_errors::err_failed_update_user()));
            }
        };

        if let Err(e) = self.users.update_password(user_id, &password_hash).await {
            return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_failed_update_user()));
        }

        // Best-effort per spec §4.7.5 step 4: failures here are logged but
        // not surfaced to the caller.
        if let Err(e) = self.reset_tokens.delete(reset_token).await {
            tracing::warn!(error = %e, "failed to delete consumed reset token");
        }
        self.cache.delete_reset_token(reset_token).await;

        envelope.success("password reset", &[("user_id", &user_id.to_string())]);
        Ok(true)
    }

    /// §4.7.6 VerifyCode.
    pub async fn verify_code(&self, verification_code: &str) -> Result<bool, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "VerifyCode", &[]);

        let user = match self.users.find_by_verification_code(verification_code).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                return Err(envelope.fail(ErrorKind::NotFound, "no such verification code", user_errors::err_user_not_found()));
            }
            Err(e) => {
                return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_user_not_found()));
            }
        };

        if let Err(e) = self.users.set_verified(user.id).await {
            return Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_failed_update_user()));
        }

        self.cache.delete_verification_code(&user.email).await;

        let body = verify_code_success_body(&user.email);
        let payload_json = json!(body);
        if let Err(e) = self.publisher.publish(TOPIC_VERIFY_CODE_SUCCESS, &user.id.to_string(), &payload_json).await {
            return Err(envelope.fail(ErrorKind::Publisher, &e, user_errors::err_failed_update_user()));
        }

        envelope.success("account verified", &[("user_id", &user.id.to_string())]);
        Ok(true)
    }

    /// `GetMe`/`FindById` (spec §6.1).
    pub async fn find_by_id(&self, id: Uuid) -> Result<UserResponse, ErrorResponse> {
        let mut envelope = Envelope::start(&self.metrics, "FindById", &[("id", &id.to_string())]);

        match self.users.find_by_id(id).await {
            Ok(Some(u)) => {
                envelope.success("found", &[]);
                Ok(to_user_response(&u))
            }
            Ok(None) => Err(envelope.fail(ErrorKind::NotFound, "no such user", user_errors::err_user_not_found())),
            Err(e) => Err(envelope.fail(ErrorKind::Repository, &e.to_string(), user_errors::err_user_not_found())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::cache::InMemoryStore;
    use shared::config::JwtConfig;
    use shared::events::NullPublisher;

    use crate::cache::AuthCache;
    use crate::repository::{
        MockRefreshTokenRepository, MockResetTokenRepository, MockRoleRepository, MockUserRepository,
        MockUserRoleRepository,
    };

    fn test_jwt() -> Arc<JwtService> {
        Arc::new(JwtService::new(JwtConfig {
            secret: "test_secret_key_minimum_32_chars_required".to_string(),
            access_token_ttl_seconds: 900,
            refresh_token_ttl_seconds: 604800,
            issuer: "test-issuer".to_string(),
            audience: "test-audience".to_string(),
        }))
    }

    fn sample_user(email: &str, password_hash: &str, verified: bool) -> crate::domain::entities::User {
        crate::domain::entities::User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            verification_code: Some("abc123".to_string()),
            verified,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_role() -> crate::domain::entities::Role {
        crate::domain::entities::Role {
            id: Uuid::new_v4(),
            name: "student".to_string(),
            created_at: Utc::now(),
        }
    }

    /// Builds an `AuthService` wired to the given mocks, an in-memory cache,
    /// a `NullPublisher`, and a real `JwtService`/`PasswordHasher` pair.
    #[allow(clippy::too_many_arguments)]
    fn build_service(
        users: MockUserRepository,
        roles: MockRoleRepository,
        user_roles: MockUserRoleRepository,
        refresh_tokens: MockRefreshTokenRepository,
        reset_tokens: MockResetTokenRepository,
    ) -> AuthService {
        AuthService::new(
            Arc::new(users),
            Arc::new(roles),
            Arc::new(user_roles),
            Arc::new(refresh_tokens),
            Arc::new(reset_tokens),
            AuthCache::with_store(InMemoryStore::new()),
            Arc::new(NullPublisher::new()),
            Arc::new(PasswordHasher::new()),
            test_jwt(),
            Arc::new(MetricsRegistry::new_for_test()),
            "student".to_string(),
        )
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let existing = sample_user("ada@example.com", "irrelevant", true);
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| Ok(Some(existing.clone())));
        users.expect_create().times(0);

        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().times(0);
        let mut user_roles = MockUserRoleRepository::new();
        user_roles.expect_assign().times(0);

        let service = build_service(users, roles, user_roles, MockRefreshTokenRepository::new(), MockResetTokenRepository::new());

        let result = service.register("ada@example.com", "Password1!", "Ada", "Lovelace").await;
        let err = result.expect_err("duplicate email must be rejected");
        assert_eq!(err, user_errors::err_user_already_exists());
    }

    #[tokio::test]
    async fn register_assigns_default_role_and_caches_verification_code() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::{FirstName, LastName};
        use fake::Fake;

        let email: String = SafeEmail().fake();
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().returning(|new_user| {
            Ok(crate::domain::entities::User {
                id: Uuid::new_v4(),
                email: new_user.email,
                password_hash: new_user.password_hash,
                verification_code: Some(new_user.verification_code),
                verified: false,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

        let mut roles = MockRoleRepository::new();
        let role = sample_role();
        roles.expect_find_by_name().returning(move |_| Ok(Some(role.clone())));

        let mut user_roles = MockUserRoleRepository::new();
        user_roles.expect_assign().returning(|_, _| Ok(()));

        let service = build_service(users, roles, user_roles, MockRefreshTokenRepository::new(), MockResetTokenRepository::new());

        let response = service
            .register(&email, "Password1!", &first_name, &last_name)
            .await
            .expect("registration should succeed");
        assert_eq!(response.email, email);
        assert!(!response.verified);
    }

    #[tokio::test]
    async fn login_cache_hit_skips_repository() {
        let cached_tokens = TokenResponse {
            access: "cached-access".to_string(),
            refresh: "cached-refresh".to_string(),
        };

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(0);

        let service = build_service(
            users,
            MockRoleRepository::new(),
            MockUserRoleRepository::new(),
            MockRefreshTokenRepository::new(),
            MockResetTokenRepository::new(),
        );
        service.cache.set_login_session("cached@example.com", &cached_tokens).await;

        let result = service.login("cached@example.com", "whatever").await.expect("cache hit must not fail");
        assert_eq!(result.access, "cached-access");
        assert_eq!(result.refresh, "cached-refresh");
    }

    #[tokio::test]
    async fn login_password_mismatch_leaves_state_unchanged() {
        let hasher = PasswordHasher::new();
        let real_hash = hasher.hash("CorrectHorseBattery1!").unwrap();
        let user = sample_user("ada@example.com", &real_hash, true);

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| Ok(Some(user.clone())));

        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens.expect_delete_for_user().times(0);
        refresh_tokens.expect_create().times(0);

        let service = build_service(
            users,
            MockRoleRepository::new(),
            MockUserRoleRepository::new(),
            refresh_tokens,
            MockResetTokenRepository::new(),
        );

        let err = service
            .login("ada@example.com", "WrongPassword1!")
            .await
            .expect_err("wrong password must be rejected");
        assert_eq!(err, user_errors::err_invalid_credentials());

        // Login must not have been cached on a failed attempt.
        assert!(service.cache.get_login_session("ada@example.com").await.is_none());
    }

    #[tokio::test]
    async fn login_rejects_unverified_account() {
        let user = sample_user("ada@example.com", "irrelevant", false);
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(move |_| Ok(Some(user.clone())));

        let service = build_service(
            users,
            MockRoleRepository::new(),
            MockUserRoleRepository::new(),
            MockRefreshTokenRepository::new(),
            MockResetTokenRepository::new(),
        );

        let err = service
            .login("ada@example.com", "whatever")
            .await
            .expect_err("unverified account must be rejected");
        assert_eq!(err, user_errors::err_not_verified());
    }

    #[tokio::test]
    async fn refresh_rotates_and_is_single_use() {
        let jwt = test_jwt();
        let user_id = Uuid::new_v4();
        let tokens = jwt.generate_tokens(user_id, "ada@example.com", "student").unwrap();

        let stored = RefreshToken {
            user_id,
            token: tokens.refresh_token.clone(),
            expires_at: Utc::now() + Duration::hours(1),
        };

        let mut refresh_tokens = MockRefreshTokenRepository::new();
        let lookup_token = tokens.refresh_token.clone();
        refresh_tokens
            .expect_find_by_token()
            .withf(move |t| t == lookup_token.as_str())
            .returning(move |_| Ok(Some(stored.clone())));
        // Called once explicitly in `refresh`, once more inside the shared
        // token-issuance helper.
        refresh_tokens.expect_delete_for_user().times(2).returning(|_| Ok(()));
        refresh_tokens.expect_create().times(1).returning(|_| Ok(()));

        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockRoleRepository::new()),
            Arc::new(MockUserRoleRepository::new()),
            Arc::new(refresh_tokens),
            Arc::new(MockResetTokenRepository::new()),
            AuthCache::with_store(InMemoryStore::new()),
            Arc::new(NullPublisher::new()),
            Arc::new(PasswordHasher::new()),
            jwt,
            Arc::new(MetricsRegistry::new_for_test()),
            "student".to_string(),
        );

        let refreshed = service.refresh(&tokens.refresh_token).await.expect("refresh should succeed");
        assert_ne!(refreshed.refresh, tokens.refresh_token);
    }

    #[tokio::test]
    async fn reset_password_mismatch_leaves_password_unchanged() {
        let mut users = MockUserRepository::new();
        users.expect_update_password().times(0);

        let mut reset_tokens = MockResetTokenRepository::new();
        reset_tokens.expect_delete().times(0);

        let service = build_service(
            users,
            MockRoleRepository::new(),
            MockUserRoleRepository::new(),
            MockRefreshTokenRepository::new(),
            reset_tokens,
        );
        service.cache.set_reset_token_user("some-token", Uuid::new_v4()).await;

        let err = service
            .reset_password("some-token", "Password1!", "Different1!")
            .await
            .expect_err("mismatched confirmation must be rejected");
        assert_eq!(err, user_errors::err_password_mismatch());
    }

    #[tokio::test]
    async fn verify_code_invalidates_cache_and_marks_verified() {
        let user = sample_user("ada@example.com", "irrelevant", false);
        let user_id = user.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_verification_code().returning(move |_| Ok(Some(user.clone())));
        users.expect_set_verified().withf(move |id| *id == user_id).returning(|_| Ok(()));

        let service = build_service(
            users,
            MockRoleRepository::new(),
            MockUserRoleRepository::new(),
            MockRefreshTokenRepository::new(),
            MockResetTokenRepository::new(),
        );
        service.cache.set_verification_code("ada@example.com", "abc123").await;

        let ok = service.verify_code("abc123").await.expect("verification should succeed");
        assert!(ok);
    }
}
