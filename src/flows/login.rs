//! Login flow.
//!
//! Unverified users are never authenticated: a correct password with a null
//! verification timestamp short-circuits into verification re-issuance.
//!
//! Emits tracing events for security monitoring:
//! - `auth.login.denied` - Login denied (unknown email, bad credentials)
//! - `auth.login.reissued` - Verification token re-issued for unverified user
//! - `auth.login.succeeded` - Credentials accepted

use crate::config::AuthConfig;
use crate::error::Result;
use crate::exchange::{CredentialExchange, ExchangeOutcome};
use crate::notify::NotificationSink;
use crate::store::{CredentialStore, TokenKind};
use crate::token::TokenIssuer;
use std::sync::Arc;
use validator::Validate;

use super::types::{Denial, LoginRequest, Outcome};

/// Handles the login flow.
pub struct LoginFlow<S, N, X> {
    store: Arc<S>,
    sink: Arc<N>,
    exchange: X,
    issuer: TokenIssuer<S>,
}

impl<S, N, X> LoginFlow<S, N, X>
where
    S: CredentialStore,
    N: NotificationSink,
    X: CredentialExchange,
{
    pub fn new(store: Arc<S>, sink: Arc<N>, exchange: X, config: &AuthConfig) -> Self {
        Self {
            issuer: TokenIssuer::new(store.clone(), config),
            store,
            sink,
            exchange,
        }
    }

    pub async fn login(&self, req: LoginRequest) -> Result<Outcome> {
        if req.validate().is_err() {
            return Ok(Outcome::denied(Denial::Validation, "Validation failed"));
        }

        let user = match self.store.find_user_by_email(&req.email).await? {
            Some(u) if u.has_credential() => u,
            _ => {
                tracing::info!(
                    target: "auth.login.denied",
                    email = %req.email,
                    reason = "unknown_email",
                    "Login denied"
                );
                return Ok(Outcome::denied(Denial::NotFound, "Email does not exist"));
            }
        };

        // Unverified users are re-prompted to verify, never authenticated.
        if !user.is_verified() {
            let token = self.issuer.issue(TokenKind::Verification, &user.email).await?;
            self.sink
                .send_verification_email(&token.email, &token.token)
                .await?;

            tracing::info!(
                target: "auth.login.reissued",
                email = %user.email,
                "Verification token re-issued for unverified user"
            );
            return Ok(Outcome::ok("Confirmation email sent"));
        }

        let hash = user.password_hash.as_deref().unwrap_or_default();
        match self.exchange.sign_in(&user.email, &req.password, hash).await? {
            ExchangeOutcome::Authenticated => {
                tracing::info!(
                    target: "auth.login.succeeded",
                    email = %user.email,
                    "Credentials accepted"
                );
                Ok(Outcome::ok("Login successful"))
            }
            ExchangeOutcome::InvalidCredentials => {
                tracing::info!(
                    target: "auth.login.denied",
                    email = %user.email,
                    reason = "invalid_credentials",
                    "Login denied"
                );
                Ok(Outcome::denied(Denial::InvalidCredentials, "Invalid credentials"))
            }
            ExchangeOutcome::Failed(reason) => {
                tracing::warn!(
                    target: "auth.login.denied",
                    email = %user.email,
                    reason = %reason,
                    "Credential exchange failed"
                );
                Ok(Outcome::denied(Denial::Unexpected, "Something went wrong"))
            }
        }
    }
}
