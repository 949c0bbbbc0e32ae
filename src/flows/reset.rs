//! Password reset flow.
//!
//! Two steps: request (issue and dispatch a reset token) and complete
//! (redeem the token and overwrite the password hash). The same-password
//! check verifies the raw candidate against the stored hash with the
//! hashing primitive, so it actually triggers. Consumption is atomic and
//! single-use, and an expired token is left in place untouched.
//!
//! Emits tracing events:
//! - `auth.password.reset_requested` - Reset token issued and dispatched
//! - `auth.password.reset_denied` - Reset denied (bad token, same password)
//! - `auth.password.reset_completed` - Password overwritten, token consumed

use crate::config::AuthConfig;
use crate::error::Result;
use crate::notify::NotificationSink;
use crate::password::{PasswordHasher, PasswordPolicy};
use crate::store::{CredentialStore, TokenKind, UserChanges};
use crate::token::TokenIssuer;
use std::sync::Arc;
use std::time::SystemTime;
use validator::Validate;

use super::types::{Denial, Outcome, PasswordResetComplete, PasswordResetRequest};

/// Handles the password reset flow.
pub struct PasswordResetFlow<S, N> {
    store: Arc<S>,
    sink: Arc<N>,
    issuer: TokenIssuer<S>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl<S, N> PasswordResetFlow<S, N>
where
    S: CredentialStore,
    N: NotificationSink,
{
    pub fn new(store: Arc<S>, sink: Arc<N>, config: &AuthConfig) -> Self {
        Self {
            issuer: TokenIssuer::new(store.clone(), config),
            hasher: PasswordHasher::new(config.hashing.clone()),
            policy: config.policy.clone(),
            store,
            sink,
        }
    }

    /// Request a password reset: issue a token and dispatch it.
    pub async fn request_reset(&self, req: PasswordResetRequest) -> Result<Outcome> {
        if req.validate().is_err() {
            return Ok(Outcome::denied(Denial::Validation, "Validation failed"));
        }

        if self.store.find_user_by_email(&req.email).await?.is_none() {
            tracing::info!(
                target: "auth.password.reset_denied",
                email = %req.email,
                reason = "unknown_email",
                "Password reset denied"
            );
            return Ok(Outcome::denied(Denial::NotFound, "User does not exist"));
        }

        let token = self.issuer.issue(TokenKind::PasswordReset, &req.email).await?;
        self.sink
            .send_reset_password_email(&token.email, &token.token)
            .await?;

        tracing::info!(
            target: "auth.password.reset_requested",
            email = %req.email,
            "Password reset email sent"
        );

        Ok(Outcome::ok("Password reset email sent"))
    }

    /// Complete a password reset: redeem the token and overwrite the hash.
    pub async fn complete_reset(&self, req: PasswordResetComplete) -> Result<Outcome> {
        if req.validate().is_err() || !self.policy.is_valid(&req.new_password) {
            return Ok(Outcome::denied(Denial::Validation, "Validation failed"));
        }

        let token = match self
            .store
            .find_token(TokenKind::PasswordReset, &req.token)
            .await?
        {
            Some(t) => t,
            None => {
                tracing::info!(
                    target: "auth.password.reset_denied",
                    reason = "invalid_token",
                    "Password reset denied"
                );
                return Ok(Outcome::denied(Denial::InvalidToken, "Invalid token"));
            }
        };

        if token.is_expired(SystemTime::now()) {
            tracing::info!(
                target: "auth.password.reset_denied",
                email = %token.email,
                reason = "expired_token",
                "Password reset denied"
            );
            return Ok(Outcome::denied(Denial::ExpiredToken, "Token has expired"));
        }

        let user = match self.store.find_user_by_email(&token.email).await? {
            Some(u) => u,
            None => {
                tracing::warn!(
                    target: "auth.password.reset_denied",
                    email = %token.email,
                    reason = "user_missing",
                    "Password reset denied"
                );
                return Ok(Outcome::denied(Denial::NotFound, "User does not exist"));
            }
        };

        // Reject a no-op reset by verifying the candidate against the
        // stored hash.
        if let Some(hash) = user.password_hash.as_deref().filter(|h| !h.is_empty()) {
            if self.hasher.verify(&req.new_password, hash)? {
                tracing::info!(
                    target: "auth.password.reset_denied",
                    email = %token.email,
                    reason = "same_password",
                    "Password reset denied"
                );
                return Ok(Outcome::denied(
                    Denial::SamePassword,
                    "Same password cannot be reset",
                ));
            }
        }

        let new_hash = self.hasher.hash(&req.new_password)?;

        if !self
            .store
            .consume_token(TokenKind::PasswordReset, &token.id)
            .await?
        {
            return Ok(Outcome::denied(Denial::InvalidToken, "Invalid token"));
        }

        self.store
            .update_user(&user.id, UserChanges::password(new_hash))
            .await?;

        tracing::info!(
            target: "auth.password.reset_completed",
            email = %token.email,
            "Password reset completed"
        );

        Ok(Outcome::ok("Password reset successfully"))
    }
}
