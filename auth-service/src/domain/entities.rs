//! Core entities owned by the authentication service (spec §3.1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity record. Never hard-deleted except via administrative purge
/// (spec §3.1) — there is no `Trashed`/`Permanent` pair for `User` the way
/// there is for `Card`/`Merchant`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub verification_code: Option<String>,
    pub verified: bool,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub verification_code: String,
    pub first_name: String,
    pub last_name: String,
}

/// Name-keyed role. `name` is the lookup key used by the default-role
/// policy (spec §9 redesign flag: lifted to `AuthPolicyConfig`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Association record between a user and a role.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

/// At most one active row per `user_id` (spec §3.1 invariant). Creating a
/// new one is create-after-delete from the caller's perspective.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RefreshToken {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Single-use; deleted on successful password reset (spec §3.1).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ResetToken {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Spec §6.3: exactly this textual shape, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_expiry(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
