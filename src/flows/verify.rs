//! Email verification flow.
//!
//! Consumption is single-use: the token is atomically removed before the
//! user record is touched, so of two concurrent redeemers at most one can
//! proceed. An expired token is left in place untouched.
//!
//! Emits tracing events:
//! - `auth.verify.denied` - Verification denied (bad/expired token, missing user)
//! - `auth.verify.succeeded` - Email verified, token consumed

use crate::error::Result;
use crate::store::{CredentialStore, TokenKind, UserChanges};
use std::sync::Arc;
use std::time::SystemTime;
use validator::Validate;

use super::types::{Denial, Outcome, VerifyTokenRequest};

/// Handles email verification.
pub struct VerificationFlow<S> {
    store: Arc<S>,
}

impl<S: CredentialStore> VerificationFlow<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn verify(&self, req: VerifyTokenRequest) -> Result<Outcome> {
        if req.validate().is_err() {
            return Ok(Outcome::denied(Denial::Validation, "Validation failed"));
        }

        let token = match self
            .store
            .find_token(TokenKind::Verification, &req.token)
            .await?
        {
            Some(t) => t,
            None => {
                tracing::info!(
                    target: "auth.verify.denied",
                    reason = "invalid_token",
                    "Verification denied"
                );
                return Ok(Outcome::denied(Denial::InvalidToken, "Invalid token"));
            }
        };

        if token.is_expired(SystemTime::now()) {
            tracing::info!(
                target: "auth.verify.denied",
                email = %token.email,
                reason = "expired_token",
                "Verification denied"
            );
            return Ok(Outcome::denied(Denial::ExpiredToken, "Token has expired"));
        }

        // Fail fast when the account vanished between issuance and
        // redemption, rather than updating a phantom record.
        let user = match self.store.find_user_by_email(&token.email).await? {
            Some(u) => u,
            None => {
                tracing::warn!(
                    target: "auth.verify.denied",
                    email = %token.email,
                    reason = "user_missing",
                    "Verification denied"
                );
                return Ok(Outcome::denied(Denial::NotFound, "User does not exist"));
            }
        };

        // Single-use guarantee: whoever wins this atomic delete proceeds;
        // the loser sees the token as already gone.
        if !self
            .store
            .consume_token(TokenKind::Verification, &token.id)
            .await?
        {
            tracing::info!(
                target: "auth.verify.denied",
                email = %token.email,
                reason = "already_consumed",
                "Verification denied"
            );
            return Ok(Outcome::denied(Denial::InvalidToken, "Invalid token"));
        }

        self.store
            .update_user(
                &user.id,
                UserChanges::verified(SystemTime::now()).with_email(token.email.clone()),
            )
            .await?;

        tracing::info!(
            target: "auth.verify.succeeded",
            email = %token.email,
            "Email verified"
        );

        Ok(Outcome::ok("Email verified"))
    }
}
