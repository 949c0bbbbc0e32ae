//! Credential store contract.
//!
//! The store is an external collaborator: it owns user and token records and
//! provides unique-key lookup plus atomic create/update/delete. Implement
//! [`CredentialStore`] for your database layer. The trait folds the original
//! createToken/deleteToken pair into [`replace_token`](CredentialStore::replace_token)
//! and [`consume_token`](CredentialStore::consume_token) so that "at most one
//! live token per email per kind" and single-use consumption rest on the
//! store's per-key atomicity rather than on application-level sequencing.

use crate::error::Result;
use async_trait::async_trait;
use std::time::SystemTime;

/// A user identity record.
///
/// Flows only ever hold a per-request snapshot of this record; the store owns
/// the authoritative copy. `email` is a case-sensitive key as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// PHC-formatted hash; `None` for accounts with no local credential.
    pub password_hash: Option<String>,
    /// When the email was verified; `None` means unverified.
    pub verified_at: Option<SystemTime>,
}

impl UserRecord {
    /// Whether the record carries a usable password hash.
    pub fn has_credential(&self) -> bool {
        self.password_hash
            .as_deref()
            .map(|h| !h.is_empty())
            .unwrap_or(false)
    }

    pub fn is_verified(&self) -> bool {
        self.verified_at.is_some()
    }
}

/// The two token flavors the store keeps, in separate namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Verification,
    PasswordReset,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::PasswordReset => "password_reset",
        }
    }
}

/// An ephemeral single-use token record.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub id: String,
    pub email: String,
    pub token: String,
    /// Absolute expiry, fixed at creation and never extended.
    pub expires_at: SystemTime,
}

impl TokenRecord {
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at < now
    }
}

/// A partial update applied to a user record.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub verified_at: Option<SystemTime>,
}

impl UserChanges {
    pub fn password(hash: impl Into<String>) -> Self {
        Self {
            password_hash: Some(hash.into()),
            ..Default::default()
        }
    }

    pub fn verified(at: SystemTime) -> Self {
        Self {
            verified_at: Some(at),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Storage operations required by the auth flows.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by email (exact match on the stored key).
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Create a user with no verification timestamp.
    ///
    /// Implementations must enforce email uniqueness and fail when a record
    /// already exists for the email.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<UserRecord>;

    /// Apply a partial update to a user, returning the updated record.
    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<UserRecord>;

    /// Look up a token by its opaque string within a kind.
    async fn find_token(&self, kind: TokenKind, token: &str) -> Result<Option<TokenRecord>>;

    /// Atomically delete any live token of `kind` for `email`, then insert a
    /// new one. This is the operational enforcement of "at most one live
    /// token per email per kind"; implementations must make the
    /// delete-then-insert transactional.
    async fn replace_token(
        &self,
        kind: TokenKind,
        email: &str,
        token: &str,
        expires_at: SystemTime,
    ) -> Result<TokenRecord>;

    /// Atomically delete a token by id.
    ///
    /// Returns `true` if the token was still present, `false` if another
    /// request consumed it first. Two concurrent consumers of the same token
    /// must not both observe `true`.
    async fn consume_token(&self, kind: TokenKind, id: &str) -> Result<bool>;
}
