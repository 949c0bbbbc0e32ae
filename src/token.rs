//! Single-use token issuance.
//!
//! Tokens are opaque URL-safe strings drawn from a cryptographically
//! unpredictable source, paired with a fixed expiry horizon. Issuing a token
//! for an email replaces any prior live token of the same kind, so at most
//! one is redeemable at a time.

use crate::config::AuthConfig;
use crate::error::Result;
use crate::store::{CredentialStore, TokenKind, TokenRecord};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Issues verification and password reset tokens against a store.
pub struct TokenIssuer<S> {
    store: Arc<S>,
    verification_ttl: Duration,
    reset_ttl: Duration,
}

impl<S: CredentialStore> TokenIssuer<S> {
    pub fn new(store: Arc<S>, config: &AuthConfig) -> Self {
        Self {
            store,
            verification_ttl: config.verification_token_ttl,
            reset_ttl: config.reset_token_ttl,
        }
    }

    /// Issue a fresh token for `email`, replacing any prior live token of
    /// the same kind. The expiry is fixed at issuance.
    pub async fn issue(&self, kind: TokenKind, email: &str) -> Result<TokenRecord> {
        let token = generate_secure_token();
        let expires_at = SystemTime::now() + self.ttl(kind);

        let record = self
            .store
            .replace_token(kind, email, &token, expires_at)
            .await?;

        tracing::debug!(
            target: "auth.token",
            kind = kind.as_str(),
            email = %email,
            expires_in_secs = self.ttl(kind).as_secs(),
            "Token issued"
        );

        Ok(record)
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Verification => self.verification_ttl,
            TokenKind::PasswordReset => self.reset_ttl,
        }
    }
}

/// Generate a secure random token.
fn generate_secure_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
