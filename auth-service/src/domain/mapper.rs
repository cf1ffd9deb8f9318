//! Pure, total mappers from repository records to response DTOs (C5).
//! Never query the database, never return errors.

use super::dto::{TokenResponse, UserResponse};
use super::entities::User;

pub fn to_user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        verified: user.verified,
        created_at: user.created_at.to_rfc3339(),
    }
}

pub fn to_token_response(access: String, refresh: String) -> TokenResponse {
    TokenResponse { access, refresh }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "a@b.c".to_string(),
            password_hash: "hash".to_string(),
            verification_code: None,
            verified: true,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn mapper_is_deterministic() {
        let user = sample_user();
        assert_eq!(
            to_user_response(&user).id,
            to_user_response(&user).id
        );
        assert_eq!(to_user_response(&user).email, user.email);
    }
}
