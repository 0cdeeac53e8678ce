//! End-to-end scenarios against in-memory stores
//!
//! Registration, login, token verification and ownership enforcement wired
//! together the way the HTTP service wires them.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{FailingAccountRepository, TestApp};
use warden_auth_core::{AuthError, Authenticator, ErrorKind, TokenError};
use warden_types::TodoChanges;

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new();

    let alice = app
        .authenticator
        .register("alice", "secretpw", "a@x.com")
        .await
        .expect("first registration succeeds");
    assert_eq!(alice.username, "alice");

    let err = app
        .authenticator
        .register("alice", "secretpw", "a@x.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_stored_hash_is_not_plaintext() {
    use warden_db::AccountRepository;

    let app = TestApp::new();
    app.authenticator
        .register("alice", "secretpw", "a@x.com")
        .await
        .unwrap();

    let row = app.accounts.find_by_username("alice").await.unwrap().unwrap();
    assert!(!row.password_hash.contains("secretpw"));
    assert!(row.password_hash.starts_with("$2"));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_wrong_then_right_secret() {
    let app = TestApp::new();
    let alice = app
        .authenticator
        .register("alice", "secretpw", "a@x.com")
        .await
        .unwrap();

    let now = Utc::now();
    let err = app
        .authenticator
        .login("alice", "wrongpw", now)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);

    let token = app
        .authenticator
        .login("alice", "secretpw", now)
        .await
        .unwrap();
    let claims = app.codec.parse(&token, now).unwrap();
    assert_eq!(claims.user_id, alice.id);
    assert_eq!(claims.username, "alice");
    assert!(claims.exp > now.timestamp());
}

#[tokio::test]
async fn test_unknown_account_and_wrong_secret_look_identical() {
    let app = TestApp::new();
    app.authenticator
        .register("alice", "secretpw", "a@x.com")
        .await
        .unwrap();

    let now = Utc::now();
    let unknown = app
        .authenticator
        .login("mallory", "secretpw", now)
        .await
        .unwrap_err();
    let wrong = app
        .authenticator
        .login("alice", "wrongpw", now)
        .await
        .unwrap_err();

    assert!(matches!(unknown, AuthError::AccountNotFound));
    assert!(matches!(wrong, AuthError::InvalidCredential));
    assert_eq!(unknown.kind(), wrong.kind());
    assert_eq!(unknown.error_code(), wrong.error_code());
    assert_eq!(unknown.public_message(), wrong.public_message());
    assert_eq!(unknown.status_code(), wrong.status_code());
}

#[tokio::test]
async fn test_store_outage_is_internal_not_auth_failure() {
    let authenticator = Authenticator::new(
        &common::test_config(),
        Arc::new(FailingAccountRepository),
    )
    .unwrap();

    let err = authenticator
        .login("alice", "secretpw", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Database(_)));
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_removed_account_cannot_log_in() {
    let app = TestApp::new();
    let alice = app
        .authenticator
        .register("alice", "secretpw", "a@x.com")
        .await
        .unwrap();
    let identity = app
        .guard
        .authenticate(
            Some(&format!(
                "Bearer {}",
                app.authenticator
                    .login("alice", "secretpw", Utc::now())
                    .await
                    .unwrap()
            )),
            Utc::now(),
        )
        .unwrap();

    app.account_service.remove(alice.id, &identity).await.unwrap();

    let err = app
        .authenticator
        .login("alice", "secretpw", Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
async fn test_only_owner_updates_todo() {
    let app = TestApp::new();
    app.authenticator.register("alice", "pw-a", "a@x.com").await.unwrap();
    app.authenticator.register("bob", "pw-b", "b@x.com").await.unwrap();

    let now = Utc::now();
    let alice_token = app.authenticator.login("alice", "pw-a", now).await.unwrap();
    let bob_token = app.authenticator.login("bob", "pw-b", now).await.unwrap();
    let alice = app
        .guard
        .authenticate(Some(&format!("Bearer {alice_token}")), now)
        .unwrap();
    let bob = app
        .guard
        .authenticate(Some(&format!("Bearer {bob_token}")), now)
        .unwrap();

    let todo = app
        .todo_service
        .create("write report", "", &alice)
        .await
        .unwrap();

    let err = app
        .todo_service
        .update(
            todo.id,
            TodoChanges {
                title: Some("bob was here".into()),
                ..Default::default()
            },
            &bob,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let updated = app
        .todo_service
        .update(
            todo.id,
            TodoChanges {
                completed: Some(true),
                ..Default::default()
            },
            &alice,
        )
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.owner_id, alice.account_id);
}

// ============================================================================
// Guard
// ============================================================================

#[test]
fn test_wrong_scheme_rejected_before_parsing() {
    let app = TestApp::new();
    let err = app
        .guard
        .authenticate(Some("Basic xyz"), Utc::now())
        .unwrap_err();
    assert!(matches!(err, AuthError::MalformedCredential));
}

#[tokio::test]
async fn test_token_rejected_at_expiry() {
    let app = TestApp::new();
    app.authenticator
        .register("alice", "secretpw", "a@x.com")
        .await
        .unwrap();

    let issued = Utc::now();
    let token = app
        .authenticator
        .login("alice", "secretpw", issued)
        .await
        .unwrap();

    let header = format!("Bearer {token}");
    let later = issued + Duration::hours(24);
    let err = app.guard.authenticate(Some(&header), later).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken(TokenError::Expired)));
}
