// ==================================
// tests/integration/auth_flow_tests.rs
// ==================================
//! End-to-end register/login/logout flows against real stores.
use crate::test_utils::{flat_file_state, memory_controller, FailingGenerator};
use secureauth_common::{AuthPhase, SessionState, StoredCredential};
use secureauth_lib::{
    auth::{decode_claims, digest_password, SessionController},
    config::Settings,
    error::AppError,
    storage::{CredentialStore, FlatFileStore, MemoryStore, TOKEN_KEY, USERS_KEY, USER_KEY},
    AppState,
};
use std::sync::Arc;

#[tokio::test]
async fn test_register_logout_login_keeps_user_id() {
    let (auth, _store) = memory_controller();

    let registered = auth.register("Ada", "ada@x.com", "secret123").await.unwrap();
    assert_eq!(auth.phase(), AuthPhase::Authenticated);
    assert_eq!(auth.current_user().unwrap().name, "Ada");

    auth.logout();
    assert_eq!(auth.phase(), AuthPhase::Unauthenticated);

    let logged_in = auth.login("ada@x.com", "secret123").await.unwrap();
    assert_eq!(logged_in.id, registered.id);
    assert_eq!(logged_in, registered);
    assert_eq!(auth.phase(), AuthPhase::Authenticated);
}

#[tokio::test]
async fn test_duplicate_email_leaves_list_unchanged() {
    let (auth, store) = memory_controller();
    auth.register("Ada", "ada@x.com", "secret123").await.unwrap();
    let before = store.get(USERS_KEY).unwrap();

    let err = auth
        .register("Another Ada", "ada@x.com", "different")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateUser));
    assert_eq!(err.user_message(), "User already exists");
    assert_eq!(store.get(USERS_KEY).unwrap(), before);
    assert_eq!(auth.registered_users().unwrap().len(), 1);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let (auth, _store) = memory_controller();
    auth.register("Ada", "ada@x.com", "secret123").await.unwrap();
    auth.logout();

    let err = auth.login("ada@x.com", "secret124").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
    assert_eq!(auth.phase(), AuthPhase::Unauthenticated);
    assert_eq!(auth.last_error().as_deref(), Some("Invalid email or password"));

    let err = auth.login("nobody@x.com", "secret123").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_logout_clears_session_keys_and_state() {
    let (auth, store) = memory_controller();
    auth.register("Ada", "ada@x.com", "secret123").await.unwrap();
    assert!(store.contains_key(TOKEN_KEY));
    assert!(store.contains_key(USER_KEY));

    auth.logout();
    assert!(!store.contains_key(TOKEN_KEY));
    assert!(!store.contains_key(USER_KEY));
    // registrations survive a logout
    assert!(store.contains_key(USERS_KEY));
    assert_eq!(auth.state(), SessionState::signed_out());
}

#[tokio::test]
async fn test_stored_list_holds_digest_not_password() {
    let (auth, store) = memory_controller();
    auth.register("Ada", "ada@x.com", "secret123").await.unwrap();

    let raw = store.get(USERS_KEY).unwrap().unwrap();
    assert!(!raw.contains("secret123"));
    let users: Vec<StoredCredential> = serde_json::from_str(&raw).unwrap();
    assert_eq!(users[0].password, digest_password("secret123"));
    assert_eq!(users[0].user.email, "ada@x.com");
}

#[tokio::test]
async fn test_token_payload_matches_session_user() {
    let (auth, store) = memory_controller();
    let user = auth.register("Ada", "ada@x.com", "secret123").await.unwrap();

    let token = store.get(TOKEN_KEY).unwrap().unwrap();
    let claims = decode_claims(&token).unwrap();
    assert_eq!(claims.user, user);

    let stored_user = store.get(USER_KEY).unwrap().unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&stored_user).unwrap()["id"], user.id);
}

#[tokio::test]
async fn test_initialize_restores_persisted_session() {
    let store = Arc::new(MemoryStore::new());
    let first = SessionController::new(Arc::clone(&store));
    first.initialize().unwrap();
    let user = first.register("Ada", "ada@x.com", "secret123").await.unwrap();

    let second = SessionController::new(Arc::clone(&store));
    assert_eq!(second.phase(), AuthPhase::Loading);
    assert_eq!(second.initialize().unwrap(), AuthPhase::Authenticated);
    assert_eq!(second.current_user().unwrap(), user);
    assert_eq!(second.state().token, first.state().token);
}

#[test]
fn test_initialize_with_corrupt_user_clears_store() {
    let store = Arc::new(MemoryStore::new());
    store.set(USERS_KEY, "[]").unwrap();
    store.set(TOKEN_KEY, "a.b.c").unwrap();
    store.set(USER_KEY, "{not json").unwrap();

    let auth = SessionController::new(Arc::clone(&store));
    assert_eq!(auth.initialize().unwrap(), AuthPhase::Unauthenticated);
    assert!(!auth.state().is_loading);
    assert!(store.is_empty());
}

#[test]
fn test_corrupt_flat_file_session_keeps_foreign_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("secureauth.toml");
    let notes_path = temp_dir.path().join("notes.txt");
    std::fs::write(&config_path, "log_level = \"debug\"\n").unwrap();
    std::fs::write(&notes_path, "remember the milk").unwrap();

    let store = FlatFileStore::new(temp_dir.path()).unwrap();
    store.set(USERS_KEY, "[]").unwrap();
    store.set(TOKEN_KEY, "a.b.c").unwrap();
    store.set(USER_KEY, "{bad").unwrap();

    let auth = SessionController::new(store);
    assert_eq!(auth.initialize().unwrap(), AuthPhase::Unauthenticated);

    for key in [USERS_KEY, TOKEN_KEY, USER_KEY] {
        assert_eq!(auth.store().get(key).unwrap(), None);
    }
    assert!(config_path.exists());
    assert_eq!(std::fs::read_to_string(&notes_path).unwrap(), "remember the milk");
}

#[test]
fn test_initialize_with_empty_store() {
    let (auth, _store) = memory_controller();
    assert_eq!(auth.state(), SessionState::signed_out());
}

#[tokio::test]
async fn test_flat_file_session_survives_restart() {
    let (state, temp_dir) = flat_file_state(Arc::new(FailingGenerator::default()));
    let user = state
        .auth
        .register("Ada", "ada@x.com", "secret123")
        .await
        .unwrap();

    let reopened = SessionController::new(FlatFileStore::new(temp_dir.path()).unwrap());
    assert_eq!(reopened.initialize().unwrap(), AuthPhase::Authenticated);
    assert_eq!(reopened.current_user().unwrap().id, user.id);

    reopened.logout();
    let again = SessionController::new(FlatFileStore::new(temp_dir.path()).unwrap());
    assert_eq!(again.initialize().unwrap(), AuthPhase::Unauthenticated);
    assert!(again.login("ada@x.com", "secret123").await.is_ok());
}

#[tokio::test]
async fn test_concurrent_registrations_on_one_controller_are_serialized() {
    let (auth, _store) = memory_controller();
    let auth = Arc::new(auth);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let auth = Arc::clone(&auth);
            tokio::spawn(async move {
                auth.register("User", &format!("user{i}@x.com"), "secret123")
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let dup_handles: Vec<_> = (0..4)
        .map(|_| {
            let auth = Arc::clone(&auth);
            tokio::spawn(async move { auth.register("Dup", "dup@x.com", "secret123").await })
        })
        .collect();
    let mut accepted = 0;
    for handle in dup_handles {
        if handle.await.unwrap().is_ok() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(auth.registered_users().unwrap().len(), 9);
}

#[tokio::test]
async fn test_register_with_unbounded_ttl_does_not_overflow() {
    let settings = Settings {
        token_ttl_secs: u64::MAX,
        ..Settings::default()
    };
    let state = AppState::new(
        MemoryStore::new(),
        settings,
        Arc::new(FailingGenerator::default()),
    );

    let user = state
        .auth
        .register("Ada", "ada@x.com", "secret123")
        .await
        .unwrap();
    let token = state.auth.state().token.unwrap();
    let claims = decode_claims(&token).unwrap();
    assert_eq!(claims.user, user);
    assert_eq!(claims.exp, i64::MAX);
}
