//! In-memory collaborators for tests and local development.
//!
//! These implement the store and sink contracts with `RwLock`-guarded maps;
//! every trait method takes the write lock for its whole critical section,
//! which gives the per-key atomicity the flows rely on.

use crate::error::{AuthError, Result};
use crate::notify::NotificationSink;
use crate::store::{CredentialStore, TokenKind, TokenRecord, UserChanges, UserRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    tokens: HashMap<TokenKind, Vec<TokenRecord>>,
}

/// An in-memory [`CredentialStore`].
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record directly, bypassing the registration flow.
    pub fn insert_user(
        &self,
        email: &str,
        name: &str,
        password_hash: Option<&str>,
        verified: bool,
    ) -> UserRecord {
        let user = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: Some(name.to_string()),
            password_hash: password_hash.map(|h| h.to_string()),
            verified_at: verified.then(SystemTime::now),
        };
        let mut inner = self.inner.write().unwrap();
        inner.users.insert(email.to_string(), user.clone());
        user
    }

    /// Remove a user record, leaving any tokens behind.
    pub fn remove_user(&self, email: &str) {
        let mut inner = self.inner.write().unwrap();
        inner.users.remove(email);
    }

    /// Seed a token record directly, e.g. one that is already expired.
    pub fn insert_token(
        &self,
        kind: TokenKind,
        email: &str,
        token: &str,
        expires_at: SystemTime,
    ) -> TokenRecord {
        let record = TokenRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            token: token.to_string(),
            expires_at,
        };
        let mut inner = self.inner.write().unwrap();
        inner.tokens.entry(kind).or_default().push(record.clone());
        record
    }

    /// How many live tokens of `kind` exist for `email`.
    pub fn live_token_count(&self, kind: TokenKind, email: &str) -> usize {
        let inner = self.inner.read().unwrap();
        inner
            .tokens
            .get(&kind)
            .map(|v| v.iter().filter(|t| t.email == email).count())
            .unwrap_or(0)
    }

    /// The current token of `kind` for `email`, if any.
    pub fn token_for(&self, kind: TokenKind, email: &str) -> Option<TokenRecord> {
        let inner = self.inner.read().unwrap();
        inner
            .tokens
            .get(&kind)
            .and_then(|v| v.iter().find(|t| t.email == email).cloned())
    }

    /// Snapshot of a user record.
    pub fn user(&self, email: &str) -> Option<UserRecord> {
        let inner = self.inner.read().unwrap();
        inner.users.get(email).cloned()
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.get(email).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<UserRecord> {
        let mut inner = self.inner.write().unwrap();
        if inner.users.contains_key(email) {
            return Err(AuthError::store(format!(
                "unique key violation on email {}",
                email
            )));
        }
        let user = UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: Some(name.to_string()),
            password_hash: Some(password_hash.to_string()),
            verified_at: None,
        };
        inner.users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> Result<UserRecord> {
        let mut inner = self.inner.write().unwrap();
        let old_email = inner
            .users
            .values()
            .find(|u| u.id == id)
            .map(|u| u.email.clone())
            .ok_or_else(|| AuthError::store(format!("no user with id {}", id)))?;

        let mut user = inner.users.remove(&old_email).expect("looked up above");
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = Some(hash);
        }
        if let Some(at) = changes.verified_at {
            user.verified_at = Some(at);
        }
        inner.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn find_token(&self, kind: TokenKind, token: &str) -> Result<Option<TokenRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .tokens
            .get(&kind)
            .and_then(|v| v.iter().find(|t| t.token == token).cloned()))
    }

    async fn replace_token(
        &self,
        kind: TokenKind,
        email: &str,
        token: &str,
        expires_at: SystemTime,
    ) -> Result<TokenRecord> {
        let record = TokenRecord {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            token: token.to_string(),
            expires_at,
        };
        let mut inner = self.inner.write().unwrap();
        let tokens = inner.tokens.entry(kind).or_default();
        tokens.retain(|t| t.email != email);
        tokens.push(record.clone());
        Ok(record)
    }

    async fn consume_token(&self, kind: TokenKind, id: &str) -> Result<bool> {
        let mut inner = self.inner.write().unwrap();
        let tokens = inner.tokens.entry(kind).or_default();
        let before = tokens.len();
        tokens.retain(|t| t.id != id);
        Ok(tokens.len() < before)
    }
}

/// A delivered notification captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub kind: TokenKind,
    pub email: String,
    pub token: String,
}

/// A [`NotificationSink`] that records deliveries for assertions.
#[derive(Default)]
pub struct RecordingSink {
    sent: RwLock<Vec<Delivery>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Delivery> {
        self.sent.read().unwrap().clone()
    }

    /// The most recently delivered token of `kind` for `email`.
    pub fn last_token(&self, kind: TokenKind, email: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|d| d.kind == kind && d.email == email)
            .map(|d| d.token.clone())
    }

    fn record(&self, kind: TokenKind, email: &str, token: &str) {
        self.sent.write().unwrap().push(Delivery {
            kind,
            email: email.to_string(),
            token: token.to_string(),
        });
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send_verification_email(&self, email: &str, token: &str) -> Result<()> {
        self.record(TokenKind::Verification, email, token);
        Ok(())
    }

    async fn send_reset_password_email(&self, email: &str, token: &str) -> Result<()> {
        self.record(TokenKind::PasswordReset, email, token);
        Ok(())
    }
}

/// A [`NotificationSink`] whose deliveries always fail.
#[derive(Default)]
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn send_verification_email(&self, _email: &str, _token: &str) -> Result<()> {
        Err(AuthError::notification("delivery refused"))
    }

    async fn send_reset_password_email(&self, _email: &str, _token: &str) -> Result<()> {
        Err(AuthError::notification("delivery refused"))
    }
}
