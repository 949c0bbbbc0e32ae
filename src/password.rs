//! Password hashing and strength validation.
//!
//! Hashing uses Argon2id with configurable cost parameters. The original
//! system hashed with bcrypt at cost 10; the defaults here are the
//! equivalent work factor at OWASP-recommended Argon2id settings.

use crate::error::{AuthError, Result};

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2Hasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Cost parameters for password hashing.
#[derive(Clone, Debug)]
pub struct HashConfig {
    /// Memory cost in KiB (default: 19456 = 19MB)
    pub memory_cost: u32,
    /// Time cost / iterations (default: 2)
    pub time_cost: u32,
    /// Parallelism (default: 1)
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        // OWASP recommended minimum for Argon2id
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashConfig {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    /// Faster settings for development/testing (NOT for production).
    pub fn fast() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Handles password hashing and verification using Argon2id.
#[derive(Clone)]
pub struct PasswordHasher {
    config: HashConfig,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(HashConfig::default())
    }
}

impl PasswordHasher {
    pub fn new(config: HashConfig) -> Self {
        Self { config }
    }

    /// Hash a password, returning the PHC-formatted hash string.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = self.build_argon2()?;

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::hashing(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against a stored hash.
    ///
    /// Argon2 verification is constant-time.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::hashing(format!("Invalid password hash format: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn build_argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            None,
        )
        .map_err(|e| AuthError::hashing(format!("Invalid Argon2 params: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Password strength validation policy applied at registration and reset.
#[derive(Clone, Debug)]
pub struct PasswordPolicy {
    /// Minimum length (default: 8)
    pub min_length: usize,
    /// Maximum length (default: 128, prevents hashing DoS)
    pub max_length: usize,
    /// Require at least one digit
    pub require_digit: bool,
    /// Require at least one uppercase letter
    pub require_uppercase: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordPolicy {
    /// Basic policy: 8+ characters.
    pub fn new() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_digit: false,
            require_uppercase: false,
        }
    }

    /// Stricter policy requiring mixed character types.
    pub fn strict() -> Self {
        Self {
            min_length: 12,
            max_length: 128,
            require_digit: true,
            require_uppercase: true,
        }
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    pub fn require_digit(mut self) -> Self {
        self.require_digit = true;
        self
    }

    pub fn require_uppercase(mut self) -> Self {
        self.require_uppercase = true;
        self
    }

    /// Collect the policy violations for a candidate password.
    pub fn violations(&self, password: &str) -> Vec<String> {
        let mut violations = Vec::new();

        if password.len() < self.min_length {
            violations.push(format!("must be at least {} characters", self.min_length));
        }
        if password.len() > self.max_length {
            violations.push(format!("must be at most {} characters", self.max_length));
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("must contain a digit".to_string());
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            violations.push("must contain an uppercase letter".to_string());
        }

        violations
    }

    pub fn is_valid(&self, password: &str) -> bool {
        self.violations(password).is_empty()
    }
}
