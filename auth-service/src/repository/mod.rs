//! Narrow repository interfaces (C4). Every method is context-free here
//! (no explicit `ctx` parameter the way spec §4.4 describes — cancellation
//! propagates through sqlx's own `PgPool` / tokio task cancellation, per
//! the concurrency model in spec §5) and returns either `Option<T>`/`T` or a
//! transport-neutral `sqlx::Error`. The service layer (not the repository)
//! classifies a missing row as `not-found` vs. any other failure as
//! `repository`, per spec §4.4's error policy and the §9 open-question
//! resolution (`FindByEmail` returns `Option<T>`, never a sentinel error).

pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{NewUser, RefreshToken, ResetToken, Role, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_verification_code(&self, code: &str) -> Result<Option<User>, sqlx::Error>;
    async fn create(&self, new_user: NewUser) -> Result<User, sqlx::Error>;
    async fn set_verified(&self, id: Uuid) -> Result<(), sqlx::Error>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, sqlx::Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    async fn assign(&self, user_id: Uuid, role_id: Uuid) -> Result<(), sqlx::Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn delete_for_user(&self, user_id: Uuid) -> Result<(), sqlx::Error>;
    async fn create(&self, token: &RefreshToken) -> Result<(), sqlx::Error>;
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, sqlx::Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResetTokenRepository: Send + Sync {
    async fn create(&self, token: &ResetToken) -> Result<(), sqlx::Error>;
    async fn find_by_token(&self, token: &str) -> Result<Option<ResetToken>, sqlx::Error>;
    async fn delete(&self, token: &str) -> Result<(), sqlx::Error>;
}
