// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use secureauth_lib::error::AppError;
use std::io::{Error as IoError, ErrorKind};

#[test]
fn test_app_error_display() {
    assert_eq!(AppError::DuplicateUser.to_string(), "User already exists");
    assert_eq!(
        AppError::InvalidCredentials.to_string(),
        "Invalid email or password"
    );

    let io_error = AppError::Io(IoError::new(ErrorKind::NotFound, "File not found"));
    assert!(io_error.to_string().contains("IO error"));
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(AppError::DuplicateUser.error_code(), "AUTH_001");
    assert_eq!(AppError::InvalidCredentials.error_code(), "AUTH_002");
    assert_eq!(
        AppError::store_parse("mock_db_users", "eof").error_code(),
        "STORE_001"
    );
    assert_eq!(
        AppError::AdviceService("down".to_string()).error_code(),
        "ADVICE_001"
    );
    assert_eq!(
        AppError::InvalidInput("x".to_string()).error_code(),
        "VAL_001"
    );
}

#[test]
fn test_user_messages_are_single_sentences() {
    let errors = [
        AppError::DuplicateUser,
        AppError::InvalidCredentials,
        AppError::store_parse("secure_auth_user", "expected value at line 1"),
        AppError::AdviceService("503".to_string()),
        AppError::Internal("lock poisoned".to_string()),
    ];
    for error in errors {
        let message = error.user_message();
        assert!(!message.is_empty());
        assert!(!message.contains('\n'));
        assert!(!message.contains("poisoned"));
        assert!(!message.contains("503"));
    }
}
