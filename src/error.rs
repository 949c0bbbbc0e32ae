use std::collections::HashMap;
use std::fmt;

/// The main error type for credgate.
///
/// These variants cover infrastructure failures only. Expected workflow
/// denials (bad token, duplicate registration, wrong password) are reported
/// as an [`Outcome`](crate::flows::Outcome) with status 400 and never cross
/// the flow boundary as an `Err`.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AuthError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    pub fn hashing(msg: impl Into<String>) -> Self {
        Self::Hashing(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns a safe message suitable for surfacing to a caller.
    ///
    /// Infrastructure details (store addresses, hash parse failures) stay in
    /// the server logs; callers see a generic message.
    pub fn safe_message(&self) -> String {
        match self {
            Self::Config(msg) => format!("Invalid configuration: {}", msg),
            Self::Store(_)
            | Self::Notification(_)
            | Self::Hashing(_)
            | Self::Internal(_)
            | Self::Anyhow(_) => "Internal error".to_string(),
        }
    }

    /// Attach request-scoped context to this error for caller-facing
    /// reporting.
    pub fn with_context(self, context: ErrorContext) -> ErrorWithContext {
        ErrorWithContext::new(self, context)
    }
}

/// Error context for additional failure information attached by callers.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Unique error ID for tracking.
    pub error_id: Option<String>,
    /// Contextual key-value pairs.
    pub context: HashMap<String, String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_id(mut self, id: impl Into<String>) -> Self {
        self.error_id = Some(id.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// An error paired with request-scoped context.
///
/// This is the caller-facing rendering of an infrastructure failure: the
/// `Display` output uses [`AuthError::safe_message`], so infrastructure
/// details never leak to clients, while the full error stays available via
/// [`error`](ErrorWithContext::error) for server-side logging.
#[derive(Debug)]
pub struct ErrorWithContext {
    error: AuthError,
    context: ErrorContext,
}

impl ErrorWithContext {
    pub fn new(error: AuthError, context: ErrorContext) -> Self {
        Self { error, context }
    }

    pub fn error(&self) -> &AuthError {
        &self.error
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }
}

impl fmt::Display for ErrorWithContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error.safe_message())?;
        if let Some(id) = &self.context.error_id {
            write!(f, " (error id: {})", id)?;
        }
        Ok(())
    }
}

/// Result type alias for credgate operations.
pub type Result<T> = std::result::Result<T, AuthError>;
