// ============================
// crates/auth-lib/src/auth/session.rs
// ============================
//! Session controller: mock register/login/logout over a credential store.
use chrono::{SecondsFormat, Utc};
use metrics::counter;
use parking_lot::{Mutex, RwLock};
use rand::Rng;
use secureauth_common::{AuthPhase, SessionState, StoredCredential, UserRecord};
use tracing::{debug, info, instrument, warn};

use super::digest::digest_password_secure;
use super::token::{self, DEFAULT_TOKEN_TTL_SECS};
use crate::error::AppError;
use crate::metrics::{
    AUTH_LOGIN, AUTH_LOGIN_FAILED, AUTH_LOGOUT, AUTH_REGISTERED, AUTH_REGISTER_REJECTED,
    STORE_RESET,
};
use crate::storage::{CredentialStore, TOKEN_KEY, USERS_KEY, USER_KEY};
use crate::validation::validate_registration;

/// Length of generated user ids
pub const USER_ID_LEN: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Owns the in-memory session and every write to the credential store.
///
/// Register and login read the user list, modify it and write it back. Those
/// sequences run under one writer lock, so two calls on the same controller
/// cannot lose each other's update. Independent controllers sharing a store
/// are not coordinated.
pub struct SessionController<S> {
    store: S,
    state: RwLock<SessionState>,
    last_error: RwLock<Option<String>>,
    writer: Mutex<()>,
    token_ttl_secs: i64,
}

impl<S: CredentialStore> SessionController<S> {
    /// Create a controller in the `Loading` phase
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::loading()),
            last_error: RwLock::new(None),
            writer: Mutex::new(()),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    pub fn with_token_ttl(mut self, secs: i64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the current session
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn phase(&self) -> AuthPhase {
        self.state.read().phase()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.state.read().user.clone()
    }

    /// Message of the last failed register/login, cleared when the next one starts
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Restore a persisted session. Corrupt session data wipes the whole store.
    #[instrument(level = "debug", skip(self))]
    pub fn initialize(&self) -> Result<AuthPhase, AppError> {
        let restored = self.read_persisted_session();
        let next = match restored {
            Ok(Some((user, token))) => {
                info!(user_id = %user.id, "restored session");
                SessionState::signed_in(user, token)
            }
            Ok(None) => SessionState::signed_out(),
            Err(AppError::StoreParse { key, reason }) => {
                warn!(%key, %reason, "corrupt session data, clearing store");
                counter!(STORE_RESET).increment(1);
                if let Err(e) = self.store.clear() {
                    *self.state.write() = SessionState::signed_out();
                    return Err(e);
                }
                SessionState::signed_out()
            }
            Err(e) => {
                *self.state.write() = SessionState::signed_out();
                return Err(e);
            }
        };

        let phase = next.phase();
        *self.state.write() = next;
        Ok(phase)
    }

    /// Register a new user and sign them in
    #[instrument(skip(self, name, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserRecord, AppError> {
        self.clear_error();
        let result = match validate_registration(name, email, password) {
            Ok(()) => {
                let digest = digest_off_thread(password).await?;
                self.commit_registration(name, email, digest)
            }
            Err(e) => Err(e.into()),
        };
        self.record_outcome(result)
    }

    /// Sign in an existing user
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, AppError> {
        self.clear_error();
        let result = match digest_off_thread(password).await {
            Ok(digest) => self.commit_login(email, &digest),
            Err(e) => Err(e),
        };
        if matches!(result, Err(AppError::InvalidCredentials)) {
            counter!(AUTH_LOGIN_FAILED).increment(1);
        }
        self.record_outcome(result)
    }

    /// Drop the session. Store failures are logged, never returned.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        let _guard = self.writer.lock();
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!(%key, error = %e, "failed to remove session key");
            }
        }
        *self.state.write() = SessionState::signed_out();
        counter!(AUTH_LOGOUT).increment(1);
        info!("signed out");
    }

    /// Registered users, empty when the list is missing or unreadable
    pub fn registered_users(&self) -> Result<Vec<StoredCredential>, AppError> {
        let Some(raw) = self.store.get(USERS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                warn!(key = USERS_KEY, error = %e, "unreadable user list, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn commit_registration(
        &self,
        name: &str,
        email: &str,
        digest: String,
    ) -> Result<UserRecord, AppError> {
        let _guard = self.writer.lock();
        let mut users = self.registered_users()?;
        if users.iter().any(|u| u.user.email == email) {
            counter!(AUTH_REGISTER_REJECTED).increment(1);
            return Err(AppError::DuplicateUser);
        }

        let user = UserRecord {
            id: new_user_id(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: None,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        users.push(StoredCredential {
            user: user.clone(),
            password: digest,
        });
        self.store.set(USERS_KEY, &serde_json::to_string(&users)?)?;

        self.start_session(&user)?;
        counter!(AUTH_REGISTERED).increment(1);
        info!(user_id = %user.id, "registered");
        Ok(user)
    }

    fn commit_login(&self, email: &str, digest: &str) -> Result<UserRecord, AppError> {
        let _guard = self.writer.lock();
        let user = self
            .registered_users()?
            .into_iter()
            .find(|u| u.user.email == email && u.password == digest)
            .map(StoredCredential::into_user)
            .ok_or(AppError::InvalidCredentials)?;

        self.start_session(&user)?;
        counter!(AUTH_LOGIN).increment(1);
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// Mint a token, persist token and user, then flip to `Authenticated`
    fn start_session(&self, user: &UserRecord) -> Result<(), AppError> {
        let token = token::encode(user, self.token_ttl_secs);
        debug!(user_id = %user.id, "minted token");
        self.store.set(TOKEN_KEY, &token)?;
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        *self.state.write() = SessionState::signed_in(user.clone(), token);
        Ok(())
    }

    fn read_persisted_session(&self) -> Result<Option<(UserRecord, String)>, AppError> {
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.store.get(USER_KEY)?;
        match (token, user) {
            (Some(token), Some(raw)) => {
                let user = serde_json::from_str(&raw)
                    .map_err(|e| AppError::store_parse(USER_KEY, e))?;
                Ok(Some((user, token)))
            }
            _ => Ok(None),
        }
    }

    fn clear_error(&self) {
        *self.last_error.write() = None;
    }

    fn record_outcome(
        &self,
        result: Result<UserRecord, AppError>,
    ) -> Result<UserRecord, AppError> {
        if let Err(e) = &result {
            debug!(code = e.error_code(), error = %e, "auth operation failed");
            *self.last_error.write() = Some(e.user_message());
        }
        result
    }
}

/// Digest on the blocking pool; the owned copy is zeroized afterwards
async fn digest_off_thread(password: &str) -> Result<String, AppError> {
    let mut owned = password.to_string();
    tokio::task::spawn_blocking(move || digest_password_secure(&mut owned))
        .await
        .map_err(|e| AppError::Internal(format!("digest task failed: {e}")))
}

/// Random lowercase base-36 identifier
pub fn new_user_id() -> String {
    let mut rng = rand::rng();
    (0..USER_ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
