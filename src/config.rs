//! Workflow engine configuration.
//!
//! Token lifetimes, the register pacing hook, and password settings are
//! explicit configuration passed in at construction, so tests can inject
//! short expiries instead of relying on module-level constants.

use crate::error::{AuthError, Result};
use crate::password::{HashConfig, PasswordPolicy};
use std::time::Duration;

/// Configuration for the auth workflow engine.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// How long verification tokens stay valid.
    pub verification_token_ttl: Duration,
    /// How long password reset tokens stay valid.
    pub reset_token_ttl: Duration,
    /// Optional pause inserted after a successful registration, before the
    /// outcome is returned. `None` disables pacing entirely.
    pub register_pacing: Option<Duration>,
    /// Password hashing cost parameters.
    pub hashing: HashConfig,
    /// Password strength policy applied at registration and reset.
    pub policy: PasswordPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            verification_token_ttl: Duration::from_secs(3600),
            reset_token_ttl: Duration::from_secs(3600),
            register_pacing: Some(Duration::from_millis(400)),
            hashing: HashConfig::default(),
            policy: PasswordPolicy::default(),
        }
    }
}

/// Builder for [`AuthConfig`] with environment variable support.
#[must_use = "builder does nothing until you call build()"]
pub struct AuthConfigBuilder {
    config: AuthConfig,
    env_error: Option<String>,
}

impl AuthConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AuthConfig::default(),
            env_error: None,
        }
    }

    pub fn with_verification_token_ttl(mut self, ttl: Duration) -> Self {
        self.config.verification_token_ttl = ttl;
        self
    }

    pub fn with_reset_token_ttl(mut self, ttl: Duration) -> Self {
        self.config.reset_token_ttl = ttl;
        self
    }

    /// Set the post-registration pacing delay; `None` disables it.
    pub fn with_register_pacing(mut self, pacing: Option<Duration>) -> Self {
        self.config.register_pacing = pacing;
        self
    }

    pub fn with_hashing(mut self, hashing: HashConfig) -> Self {
        self.config.hashing = hashing;
        self
    }

    pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Load configuration from environment variables with CREDGATE_ prefix.
    ///
    /// A set but unparseable value is reported as an error from `build()`
    /// rather than silently ignored.
    pub fn from_env(mut self) -> Self {
        if let Some(secs) = self.env_u64("VERIFICATION_TOKEN_TTL_SECS") {
            self.config.verification_token_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = self.env_u64("RESET_TOKEN_TTL_SECS") {
            self.config.reset_token_ttl = Duration::from_secs(secs);
        }
        if let Some(millis) = self.env_u64("REGISTER_PACING_MS") {
            self.config.register_pacing = if millis == 0 {
                None
            } else {
                Some(Duration::from_millis(millis))
            };
        }
        self
    }

    fn env_u64(&mut self, name: &str) -> Option<u64> {
        let var = format!("CREDGATE_{}", name);
        let value = std::env::var(&var).ok()?;
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                if self.env_error.is_none() {
                    self.env_error =
                        Some(format!("{} must be a non-negative integer, got {:?}", var, value));
                }
                None
            }
        }
    }

    /// Build the configuration, validating all settings.
    pub fn build(self) -> Result<AuthConfig> {
        if let Some(msg) = self.env_error {
            return Err(AuthError::config(msg));
        }
        if self.config.verification_token_ttl.is_zero() {
            return Err(AuthError::config(
                "verification token TTL must be greater than 0",
            ));
        }
        if self.config.reset_token_ttl.is_zero() {
            return Err(AuthError::config("reset token TTL must be greater than 0"));
        }
        if self.config.policy.min_length == 0 {
            return Err(AuthError::config(
                "password policy minimum length must be greater than 0",
            ));
        }
        if self.config.policy.min_length > self.config.policy.max_length {
            return Err(AuthError::config(
                "password policy minimum length exceeds maximum length",
            ));
        }

        Ok(self.config)
    }
}

impl Default for AuthConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
