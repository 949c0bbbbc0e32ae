//! Registration flow.
//!
//! Emits tracing events for security monitoring:
//! - `auth.register.denied` - Registration denied (validation, duplicate)
//! - `auth.register.succeeded` - User created, verification email sent

use crate::config::AuthConfig;
use crate::error::Result;
use crate::notify::NotificationSink;
use crate::password::{PasswordHasher, PasswordPolicy};
use crate::store::{CredentialStore, TokenKind};
use crate::token::TokenIssuer;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use super::types::{Denial, Outcome, RegisterRequest};

/// Handles user registration.
pub struct RegistrationFlow<S, N> {
    store: Arc<S>,
    sink: Arc<N>,
    issuer: TokenIssuer<S>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    pacing: Option<Duration>,
}

impl<S, N> RegistrationFlow<S, N>
where
    S: CredentialStore,
    N: NotificationSink,
{
    pub fn new(store: Arc<S>, sink: Arc<N>, config: &AuthConfig) -> Self {
        Self {
            issuer: TokenIssuer::new(store.clone(), config),
            hasher: PasswordHasher::new(config.hashing.clone()),
            policy: config.policy.clone(),
            pacing: config.register_pacing,
            store,
            sink,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<Outcome> {
        if req.validate().is_err() || !self.policy.is_valid(&req.password) {
            tracing::info!(
                target: "auth.register.denied",
                reason = "validation",
                "Registration denied"
            );
            return Ok(Outcome::denied(Denial::Validation, "Validation failed"));
        }

        // Hash before the existence check so the raw password is dropped as
        // early as possible and both paths do comparable work.
        let password_hash = self.hasher.hash(&req.password)?;

        if self.store.find_user_by_email(&req.email).await?.is_some() {
            tracing::info!(
                target: "auth.register.denied",
                email = %req.email,
                reason = "duplicate",
                "Registration denied"
            );
            return Ok(Outcome::denied(Denial::Conflict, "User already registered"));
        }

        let user = self
            .store
            .create_user(&req.email, &req.name, &password_hash)
            .await?;

        let token = self.issuer.issue(TokenKind::Verification, &user.email).await?;
        self.sink
            .send_verification_email(&token.email, &token.token)
            .await?;

        tracing::info!(
            target: "auth.register.succeeded",
            email = %user.email,
            "User created, verification email sent"
        );

        // Post-registration pacing hook (timing smoothing); configurable,
        // disabled when None.
        if let Some(delay) = self.pacing {
            tokio::time::sleep(delay).await;
        }

        Ok(Outcome::ok("Register successful"))
    }
}
