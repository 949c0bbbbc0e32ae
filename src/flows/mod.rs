//! Auth workflow engine.
//!
//! Four flows cover the credential lifecycle: login, registration, email
//! verification, and password reset. [`AuthEngine`] wires them from a single
//! store, sink, exchange, and configuration.

pub mod login;
pub mod register;
pub mod reset;
pub mod types;
pub mod verify;

pub use login::LoginFlow;
pub use register::RegistrationFlow;
pub use reset::PasswordResetFlow;
pub use types::{
    Denial, LoginRequest, Outcome, PasswordResetComplete, PasswordResetRequest, RegisterRequest,
    VerifyTokenRequest,
};
pub use verify::VerificationFlow;

use crate::config::AuthConfig;
use crate::error::Result;
use crate::exchange::{CredentialExchange, PasswordExchange};
use crate::notify::NotificationSink;
use crate::password::PasswordHasher;
use crate::store::CredentialStore;
use std::sync::Arc;

/// The workflow engine: one construction point for all four flows.
pub struct AuthEngine<S, N, X> {
    login: LoginFlow<S, N, X>,
    register: RegistrationFlow<S, N>,
    verify: VerificationFlow<S>,
    reset: PasswordResetFlow<S, N>,
}

impl<S, N, X> AuthEngine<S, N, X>
where
    S: CredentialStore,
    N: NotificationSink,
    X: CredentialExchange,
{
    pub fn new(store: Arc<S>, sink: Arc<N>, exchange: X, config: AuthConfig) -> Self {
        Self {
            login: LoginFlow::new(store.clone(), sink.clone(), exchange, &config),
            register: RegistrationFlow::new(store.clone(), sink.clone(), &config),
            verify: VerificationFlow::new(store.clone()),
            reset: PasswordResetFlow::new(store, sink, &config),
        }
    }

    pub async fn login(&self, req: LoginRequest) -> Result<Outcome> {
        self.login.login(req).await
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<Outcome> {
        self.register.register(req).await
    }

    pub async fn verify_token(&self, req: VerifyTokenRequest) -> Result<Outcome> {
        self.verify.verify(req).await
    }

    pub async fn request_password_reset(&self, req: PasswordResetRequest) -> Result<Outcome> {
        self.reset.request_reset(req).await
    }

    pub async fn reset_password(&self, req: PasswordResetComplete) -> Result<Outcome> {
        self.reset.complete_reset(req).await
    }
}

impl<S, N> AuthEngine<S, N, PasswordExchange>
where
    S: CredentialStore,
    N: NotificationSink,
{
    /// Construct an engine with the in-crate password exchange, using the
    /// configured hashing parameters for credential comparison.
    pub fn with_password_exchange(store: Arc<S>, sink: Arc<N>, config: AuthConfig) -> Self {
        let exchange = PasswordExchange::new(PasswordHasher::new(config.hashing.clone()));
        Self::new(store, sink, exchange, config)
    }
}
