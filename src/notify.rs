//! Notification sink for delivering tokens out of band.
//!
//! The sink is an external collaborator (email transport). Dispatch is
//! fire-and-forget from the flows' perspective, but awaited so issuance
//! failures propagate.

use crate::error::Result;
use async_trait::async_trait;

/// Delivers a freshly issued token to a user via an out-of-band channel.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver an email verification token.
    async fn send_verification_email(&self, email: &str, token: &str) -> Result<()>;

    /// Deliver a password reset token.
    async fn send_reset_password_email(&self, email: &str, token: &str) -> Result<()>;
}

/// A sink that logs deliveries instead of sending them.
///
/// Useful for local development. Token material is redacted by default since
/// stdout is often captured by logging systems; enable full output only in
/// environments where that is acceptable.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    show_token: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { show_token: false }
    }

    /// Enable token output. Development only.
    pub fn with_token_output(mut self, enabled: bool) -> Self {
        if enabled {
            tracing::warn!(
                "ConsoleSink: token output enabled - tokens will be visible in logs. \
                 Do not use in production!"
            );
        }
        self.show_token = enabled;
        self
    }

    fn log(&self, channel: &str, email: &str, token: &str) {
        if self.show_token {
            tracing::info!(
                target: "auth.notify",
                channel,
                email = %email,
                token = %token,
                "Notification dispatched"
            );
        } else {
            tracing::info!(
                target: "auth.notify",
                channel,
                email = %email,
                token_len = token.len(),
                "Notification dispatched (token redacted)"
            );
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn send_verification_email(&self, email: &str, token: &str) -> Result<()> {
        self.log("verification", email, token);
        Ok(())
    }

    async fn send_reset_password_email(&self, email: &str, token: &str) -> Result<()> {
        self.log("password_reset", email, token);
        Ok(())
    }
}
