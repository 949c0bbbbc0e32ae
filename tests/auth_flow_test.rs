//! End-to-end scenarios for the credential lifecycle.
//!
//! These drive the engine the way a host application would: register,
//! verify, log in, and reset through the public API against in-memory
//! collaborators.

use credgate::testing::{FailingSink, InMemoryStore, RecordingSink};
use credgate::{
    AuthConfigBuilder, AuthEngine, ErrorContext, HashConfig, LoginRequest, PasswordExchange,
    PasswordHasher, PasswordResetComplete, PasswordResetRequest, RegisterRequest, TokenKind,
    VerifyTokenRequest,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

struct Harness {
    store: Arc<InMemoryStore>,
    sink: Arc<RecordingSink>,
    engine: AuthEngine<InMemoryStore, RecordingSink, PasswordExchange>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let config = AuthConfigBuilder::new()
        .with_hashing(HashConfig::fast())
        .with_register_pacing(None)
        .build()
        .unwrap();
    let engine = AuthEngine::with_password_exchange(store.clone(), sink.clone(), config);
    Harness { store, sink, engine }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn register(email: &str, name: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        name: name.to_string(),
        password: password.to_string(),
    }
}

fn verify(token: &str) -> VerifyTokenRequest {
    VerifyTokenRequest {
        token: token.to_string(),
    }
}

#[tokio::test]
async fn register_verify_login_lifecycle() {
    let h = harness();

    // Register
    let outcome = h
        .engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.message, "Register successful");

    // Login while unverified: correct password never authenticates
    let outcome = h.engine.login(login("a@x.com", "Secret1!")).await.unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.message, "Confirmation email sent");

    // Redeem the latest issued token
    let token = h.sink.last_token(TokenKind::Verification, "a@x.com").unwrap();
    let outcome = h.engine.verify_token(verify(&token)).await.unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.message, "Email verified");

    // Login now succeeds
    let outcome = h.engine.login(login("a@x.com", "Secret1!")).await.unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.message, "Login successful");
}

#[tokio::test]
async fn verification_token_is_single_use() {
    let h = harness();
    h.engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();

    let token = h.sink.last_token(TokenKind::Verification, "a@x.com").unwrap();

    let first = h.engine.verify_token(verify(&token)).await.unwrap();
    assert_eq!(first.status, 200);

    let second = h.engine.verify_token(verify(&token)).await.unwrap();
    assert_eq!(second.status, 400);
    assert_eq!(second.message, "Invalid token");
}

#[tokio::test]
async fn unverified_login_invalidates_prior_token() {
    let h = harness();
    h.engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();
    let registration_token = h.sink.last_token(TokenKind::Verification, "a@x.com").unwrap();

    // A second unverified login replaces the registration token
    h.engine.login(login("a@x.com", "Secret1!")).await.unwrap();

    let outcome = h
        .engine
        .verify_token(verify(&registration_token))
        .await
        .unwrap();
    assert_eq!(outcome.status, 400);
    assert_eq!(outcome.message, "Invalid token");

    // The replacement still works
    let fresh = h.sink.last_token(TokenKind::Verification, "a@x.com").unwrap();
    let outcome = h.engine.verify_token(verify(&fresh)).await.unwrap();
    assert_eq!(outcome.status, 200);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let h = harness();
    h.engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();

    let outcome = h
        .engine
        .register(register("a@x.com", "Other", "Other1!x"))
        .await
        .unwrap();
    assert_eq!(outcome.status, 400);
    assert_eq!(outcome.message, "User already registered");

    // Original record untouched
    let user = h.store.user("a@x.com").unwrap();
    assert_eq!(user.name.as_deref(), Some("A"));
}

#[tokio::test]
async fn reset_request_scenarios() {
    let h = harness();
    h.engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();

    // Unknown email
    let outcome = h
        .engine
        .request_password_reset(PasswordResetRequest {
            email: "nobody@x.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.status, 400);
    assert_eq!(outcome.message, "User does not exist");

    // Known email: token created with expiry in the future
    let outcome = h
        .engine
        .request_password_reset(PasswordResetRequest {
            email: "a@x.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.message, "Password reset email sent");

    let record = h.store.token_for(TokenKind::PasswordReset, "a@x.com").unwrap();
    assert!(record.expires_at > SystemTime::now());
}

#[tokio::test]
async fn reset_with_expired_token_leaves_row_in_place() {
    let h = harness();
    h.store.insert_user("a@x.com", "A", Some("unused"), true);
    h.store.insert_token(
        TokenKind::PasswordReset,
        "a@x.com",
        "stale",
        SystemTime::now() - Duration::from_secs(1),
    );

    let outcome = h
        .engine
        .reset_password(PasswordResetComplete {
            token: "stale".to_string(),
            new_password: "NewSecret1!".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.status, 400);
    assert_eq!(outcome.message, "Token has expired");

    // Deletion was never reached
    assert_eq!(h.store.live_token_count(TokenKind::PasswordReset, "a@x.com"), 1);
}

#[tokio::test]
async fn full_reset_rotates_the_credential() {
    let h = harness();
    h.engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();
    let token = h.sink.last_token(TokenKind::Verification, "a@x.com").unwrap();
    h.engine.verify_token(verify(&token)).await.unwrap();

    h.engine
        .request_password_reset(PasswordResetRequest {
            email: "a@x.com".to_string(),
        })
        .await
        .unwrap();
    let reset_token = h.sink.last_token(TokenKind::PasswordReset, "a@x.com").unwrap();

    let outcome = h
        .engine
        .reset_password(PasswordResetComplete {
            token: reset_token,
            new_password: "Rotated1!".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.message, "Password reset successfully");

    // Old credential no longer logs in, the new one does
    let outcome = h.engine.login(login("a@x.com", "Secret1!")).await.unwrap();
    assert_eq!(outcome.message, "Invalid credentials");

    let outcome = h.engine.login(login("a@x.com", "Rotated1!")).await.unwrap();
    assert_eq!(outcome.message, "Login successful");
}

#[tokio::test]
async fn stored_hash_is_never_the_plaintext() {
    let h = harness();
    h.engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();

    let user = h.store.user("a@x.com").unwrap();
    let stored = user.password_hash.as_deref().unwrap();
    assert_ne!(stored, "Secret1!");

    // The corrected same-password check still lets a genuinely different
    // password through
    assert!(!PasswordHasher::new(HashConfig::fast())
        .verify("Different1!", stored)
        .unwrap());
}

#[tokio::test]
async fn infrastructure_failure_renders_safely_for_callers() {
    let store = Arc::new(InMemoryStore::new());
    let config = AuthConfigBuilder::new()
        .with_hashing(HashConfig::fast())
        .with_register_pacing(None)
        .build()
        .unwrap();
    let engine = AuthEngine::with_password_exchange(store, Arc::new(FailingSink), config);

    // Dispatch fails, so the flow surfaces an Err; the host attaches
    // request context and renders it for the client
    let err = engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap_err();
    let wrapped = err.with_context(
        ErrorContext::new()
            .with_error_id("req-7")
            .with_context("operation", "register"),
    );

    let rendered = wrapped.to_string();
    assert!(rendered.contains("Internal error"));
    assert!(rendered.contains("req-7"));
    // Transport details stay server-side
    assert!(!rendered.contains("delivery refused"));
    assert!(wrapped.error().to_string().contains("delivery refused"));
}

#[tokio::test]
async fn short_expiry_from_config_is_honored() {
    let store = Arc::new(InMemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let config = AuthConfigBuilder::new()
        .with_hashing(HashConfig::fast())
        .with_verification_token_ttl(Duration::from_millis(20))
        .with_register_pacing(None)
        .build()
        .unwrap();
    let engine = AuthEngine::with_password_exchange(store, sink.clone(), config);

    engine
        .register(register("a@x.com", "A", "Secret1!"))
        .await
        .unwrap();
    let token = sink.last_token(TokenKind::Verification, "a@x.com").unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let outcome = engine.verify_token(verify(&token)).await.unwrap();
    assert_eq!(outcome.status, 400);
    assert_eq!(outcome.message, "Token has expired");
}
