//! credgate - token-gated account verification and credential change.
//!
//! credgate is the credential-and-token lifecycle core of a web
//! application's authentication surface: password login, email
//! verification, and password reset. It owns the state machine with real
//! invariants (expiry, single-use tokens, verification gating on login)
//! and treats everything around it as pluggable collaborators: the record
//! store ([`CredentialStore`]), the email transport ([`NotificationSink`]),
//! and the credential exchange ([`CredentialExchange`]).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use credgate::{AuthConfigBuilder, AuthEngine, RegisterRequest};
//! use credgate::testing::{InMemoryStore, RecordingSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> credgate::Result<()> {
//!     credgate::init_tracing();
//!
//!     let config = AuthConfigBuilder::new().from_env().build()?;
//!     let engine = AuthEngine::with_password_exchange(
//!         Arc::new(InMemoryStore::new()),
//!         Arc::new(RecordingSink::new()),
//!         config,
//!     );
//!
//!     let outcome = engine
//!         .register(RegisterRequest {
//!             email: "a@x.com".into(),
//!             name: "A".into(),
//!             password: "Secret1!".into(),
//!         })
//!         .await?;
//!     println!("{}: {}", outcome.status, outcome.message);
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
pub mod exchange;
pub mod flows;
pub mod notify;
pub mod password;
pub mod store;
pub mod testing;
pub mod token;

// Re-exports for public API
pub use config::{AuthConfig, AuthConfigBuilder};
pub use error::{AuthError, ErrorContext, ErrorWithContext, Result};
pub use exchange::{CredentialExchange, ExchangeOutcome, PasswordExchange};
pub use flows::{
    AuthEngine, Denial, LoginFlow, LoginRequest, Outcome, PasswordResetComplete,
    PasswordResetFlow, PasswordResetRequest, RegisterRequest, RegistrationFlow,
    VerificationFlow, VerifyTokenRequest,
};
pub use notify::{ConsoleSink, NotificationSink};
pub use password::{HashConfig, PasswordHasher, PasswordPolicy};
pub use store::{CredentialStore, TokenKind, TokenRecord, UserChanges, UserRecord};
pub use token::TokenIssuer;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults.
///
/// Call this early in your application, before constructing the engine.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "credgate=debug")
/// - `CREDGATE_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("CREDGATE_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
