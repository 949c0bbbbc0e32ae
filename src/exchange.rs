//! Credential exchange collaborator.
//!
//! The exchange compares submitted credentials against stored ones. Its
//! result is a tagged variant matched exhaustively by the login flow:
//! recognized failures become 400 outcomes, while transport-level `Err`s
//! are re-thrown to the caller as 5xx-class failures.

use crate::error::Result;
use crate::password::PasswordHasher;
use async_trait::async_trait;

/// The outcome of a credential exchange attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The submitted password matched the stored hash.
    Authenticated,
    /// The submitted password did not match.
    InvalidCredentials,
    /// A recognized, non-credential failure (e.g. an unparseable stored
    /// hash). Reported to the caller as a generic failure.
    Failed(String),
}

/// Compares submitted credentials against stored ones.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
        stored_hash: &str,
    ) -> Result<ExchangeOutcome>;
}

/// The in-crate default exchange: verifies the password against the stored
/// Argon2 hash.
#[derive(Clone, Default)]
pub struct PasswordExchange {
    hasher: PasswordHasher,
}

impl PasswordExchange {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self { hasher }
    }
}

#[async_trait]
impl CredentialExchange for PasswordExchange {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
        stored_hash: &str,
    ) -> Result<ExchangeOutcome> {
        match self.hasher.verify(password, stored_hash) {
            Ok(true) => Ok(ExchangeOutcome::Authenticated),
            Ok(false) => {
                tracing::info!(
                    target: "auth.exchange",
                    email = %email,
                    "Credential mismatch"
                );
                Ok(ExchangeOutcome::InvalidCredentials)
            }
            // A malformed stored hash is a recognized exchange failure, not
            // a transport error.
            Err(e) => Ok(ExchangeOutcome::Failed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::HashConfig;

    fn exchange() -> PasswordExchange {
        PasswordExchange::new(PasswordHasher::new(HashConfig::fast()))
    }

    #[tokio::test]
    async fn test_authenticated_on_match() {
        let hasher = PasswordHasher::new(HashConfig::fast());
        let hash = hasher.hash("Secret1!").unwrap();

        let outcome = exchange().sign_in("a@x.com", "Secret1!", &hash).await.unwrap();
        assert_eq!(outcome, ExchangeOutcome::Authenticated);
    }

    #[tokio::test]
    async fn test_invalid_credentials_on_mismatch() {
        let hasher = PasswordHasher::new(HashConfig::fast());
        let hash = hasher.hash("Secret1!").unwrap();

        let outcome = exchange().sign_in("a@x.com", "wrong", &hash).await.unwrap();
        assert_eq!(outcome, ExchangeOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_failed_on_garbage_hash() {
        let outcome = exchange()
            .sign_in("a@x.com", "Secret1!", "not-a-phc-string")
            .await
            .unwrap();
        assert!(matches!(outcome, ExchangeOutcome::Failed(_)));
    }
}
