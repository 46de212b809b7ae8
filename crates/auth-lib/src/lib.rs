// ============================
// secureauth-lib/src/lib.rs
// ============================
//! Core functionality for the `SecureAuth` demo: mock authentication over a
//! local credential store, plus AI-generated welcome and password copy.

pub mod advice;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::advice::{AdviceClient, GeminiGenerator, StrengthMonitor, TextGenerator};
use crate::auth::SessionController;
use crate::config::Settings;
use crate::storage::{CredentialStore, FlatFileStore};

/// Application state shared by the presentation layer
pub struct AppState<S> {
    /// Session controller
    pub auth: Arc<SessionController<S>>,
    /// Advice service client
    pub advice: Arc<AdviceClient>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            advice: Arc::clone(&self.advice),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: CredentialStore> AppState<S> {
    /// Create a new application state. The session is left in `Loading`
    /// until [`SessionController::initialize`] runs.
    pub fn new(store: S, settings: Settings, generator: Arc<dyn TextGenerator>) -> Self {
        let ttl = i64::try_from(settings.token_ttl_secs).unwrap_or(i64::MAX);
        let auth = Arc::new(SessionController::new(store).with_token_ttl(ttl));
        let advice =
            Arc::new(AdviceClient::new(generator).with_temperature(settings.advice.temperature));
        Self {
            auth,
            advice,
            settings: Arc::new(settings),
        }
    }

    /// Debounced strength checker wired to this state's advice client
    pub fn strength_monitor(&self) -> StrengthMonitor {
        StrengthMonitor::new(Arc::clone(&self.advice), self.settings.strength.clone())
    }
}

impl AppState<FlatFileStore> {
    /// Flat-file store under `settings.data_dir` and the Gemini generator
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store = FlatFileStore::new(&settings.data_dir)?;
        let generator = Arc::new(GeminiGenerator::from_settings(&settings.advice)?);
        Ok(Self::new(store, settings, generator))
    }
}
