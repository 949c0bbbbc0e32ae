//! Request and outcome types for the auth workflows.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Machine-readable kind attached to a denied outcome, so callers need not
/// parse the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// Malformed input.
    Validation,
    /// No matching user or token.
    NotFound,
    /// Token not recognized (or already consumed).
    InvalidToken,
    /// Token past its expiry.
    ExpiredToken,
    /// Duplicate registration.
    Conflict,
    /// Credential mismatch during login.
    InvalidCredentials,
    /// New password equals the current one.
    SamePassword,
    /// Recognized but unclassified failure from the credential exchange.
    Unexpected,
}

/// The result of a workflow operation.
///
/// All expected failures are recovered locally and reported here with status
/// 400; only infrastructure failures surface as `Err` past the flow boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Coarse success/failure discriminator: 200 or 400.
    pub status: u16,
    /// Human-readable reason.
    pub message: String,
    /// Machine-readable kind; absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial: Option<Denial>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            message: message.into(),
            denial: None,
        }
    }

    pub fn denied(denial: Denial, message: impl Into<String>) -> Self {
        Self {
            status: 400,
            message: message.into(),
            denial: Some(denial),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Login request from a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    /// Strength is checked against the configured password policy, not here.
    pub password: String,
}

/// Email verification request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyTokenRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

/// Password reset request (step one: send the email).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

/// Password reset completion (step two: redeem the token).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PasswordResetComplete {
    #[validate(length(min = 1))]
    pub token: String,
    pub new_password: String,
}
