//! Outbound event payloads and the topics they're published to (spec §6.2).

use serde::Serialize;

pub const TOPIC_REGISTER: &str = "email-service-topic-auth-register";
pub const TOPIC_FORGOT_PASSWORD: &str = "email-service-topic-auth-forgot-password";
pub const TOPIC_VERIFY_CODE_SUCCESS: &str = "email-service-topic-auth-verify-code-success";

/// Payload for `email-service-topic-auth-register` and
/// `email-service-topic-auth-forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub struct EmailPayload {
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// Renders the welcome-email body embedding the verification link (spec
/// §4.7.1 step 6). Rendering itself is out of scope (spec §1); this is the
/// minimal inline template the service owns so the payload is well-formed.
pub fn welcome_email(email: &str, verification_code: &str) -> EmailPayload {
    EmailPayload {
        email: email.to_string(),
        subject: "Verify your account".to_string(),
        body: format!(
            "<p>Welcome! Verify your account using this link: \
             <a href=\"https://app.example.com/verify?code={verification_code}\">Verify</a></p>"
        ),
    }
}

/// Renders the password-reset email body embedding the reset token (spec
/// §4.7.4 step 5).
pub fn reset_password_email(email: &str, reset_token: &str) -> EmailPayload {
    EmailPayload {
        email: email.to_string(),
        subject: "Reset your password".to_string(),
        body: format!(
            "<p>Reset your password using this link: \
             <a href=\"https://app.example.com/reset?token={reset_token}\">Reset</a></p>"
        ),
    }
}

/// Rendered HTML body published, unwrapped, to
/// `email-service-topic-auth-verify-code-success` (spec §6.2: payload is
/// "rendered HTML body", not the `{email,subject,body}` envelope).
pub fn verify_code_success_body(email: &str) -> String {
    format!("<p>Hi {email}, your account is now verified.</p>")
}
