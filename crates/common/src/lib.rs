// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the `SecureAuth` session library and its front ends.
//! This module defines the persisted records and the session snapshot.

use serde::{Deserialize, Serialize};

/// A registered user as exposed to callers and persisted as the active session user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Opaque identifier, 9 lowercase base-36 characters
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address, unique across registered users
    pub email: String,
    /// Optional avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

impl UserRecord {
    /// Upper-cased first letter of the name, used as an avatar placeholder
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

/// Entry of the registered-user list: the user plus its password digest
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    #[serde(flatten)]
    pub user: UserRecord,
    /// Hex password digest
    pub password: String,
}

impl StoredCredential {
    /// Drop the digest and keep only the public record
    pub fn into_user(self) -> UserRecord {
        self.user
    }
}

/// Coarse phase of the session state machine
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Loading,
    Unauthenticated,
    Authenticated,
}

/// In-memory authentication state
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<UserRecord>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}

impl SessionState {
    /// Initial state before the store has been consulted
    pub fn loading() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
        }
    }

    /// Logged-out, not-loading state
    pub fn signed_out() -> Self {
        Self {
            is_loading: false,
            ..Self::loading()
        }
    }

    /// Authenticated state carrying a user and its token
    pub fn signed_in(user: UserRecord, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            is_loading: false,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Loading
        } else if self.is_authenticated && self.user.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Unauthenticated
        }
    }
}

/// Structured password assessment returned by the advice service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PasswordStrength {
    /// Score from 1 (weak) to 5 (strong)
    pub score: f64,
    /// Short human-readable feedback
    pub feedback: String,
}

/// Severity of the strength meter, derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Weak,
    Fair,
    Strong,
}

impl PasswordStrength {
    pub fn level(&self) -> StrengthLevel {
        if self.score <= 2.0 {
            StrengthLevel::Weak
        } else if self.score <= 3.0 {
            StrengthLevel::Fair
        } else {
            StrengthLevel::Strong
        }
    }
}

/// Which form the presentation layer is driving
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn toggle(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}
