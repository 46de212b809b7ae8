// ============================
// crates/auth-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "secureauth.toml";

/// Environment prefix for overrides, nested keys split on `__`
pub const ENV_PREFIX: &str = "SECUREAUTH_";

/// Environment variables consulted for the advice service credential, in order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Upper bound for `token_ttl_secs` (ten years)
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory backing the flat-file credential store
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Lifetime written into the mock token's `exp` claim
    pub token_ttl_secs: u64,
    /// Advice service connection
    pub advice: AdviceSettings,
    /// Password strength checker tuning
    pub strength: StrengthSettings,
}

/// Generative text service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// Unset means the HTTP client's own defaults apply
    pub timeout_secs: Option<u64>,
}

/// Debounced strength check settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthSettings {
    /// Inputs shorter than this are not sent for analysis
    pub min_length: usize,
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            token_ttl_secs: 60 * 60, // 1 hour
            advice: AdviceSettings::default(),
            strength: StrengthSettings::default(),
        }
    }
}

impl Default for AdviceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            temperature: 0.7,
            timeout_secs: None,
        }
    }
}

impl Default for StrengthSettings {
    fn default() -> Self {
        Self {
            min_length: 6,
            debounce_ms: 1000,
        }
    }
}

impl AdviceSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl StrengthSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Settings {
    /// Load settings from `secureauth.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load settings from an explicit config file, then the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let mut settings: Settings = figment.extract()?;
        if settings.advice.api_key.is_none() {
            settings.advice.api_key = API_KEY_VARS
                .iter()
                .find_map(|var| std::env::var(var).ok())
                .filter(|key| !key.is_empty());
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Check that all values are usable
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("unknown log level `{}`", self.log_level);
        }
        if self.token_ttl_secs == 0 {
            bail!("token_ttl_secs must be greater than zero");
        }
        if self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            bail!("token_ttl_secs must be at most {MAX_TOKEN_TTL_SECS}");
        }
        if self.advice.model.trim().is_empty() {
            bail!("advice.model must not be empty");
        }
        if !(0.0..=2.0).contains(&self.advice.temperature) {
            bail!("advice.temperature must be between 0 and 2");
        }
        if self.advice.timeout_secs == Some(0) {
            bail!("advice.timeout_secs must be greater than zero when set");
        }
        Ok(())
    }

    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }
}

/// Fluent construction of [`Settings`], validated on `build`
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn data_dir(mut self, dir: PathBuf) -> Self {
        self.settings.data_dir = dir;
        self
    }

    pub fn log_level(mut self, level: String) -> Self {
        self.settings.log_level = level;
        self
    }

    pub fn token_ttl(mut self, secs: u64) -> Self {
        self.settings.token_ttl_secs = secs;
        self
    }

    pub fn api_key(mut self, key: String) -> Self {
        self.settings.advice.api_key = Some(key);
        self
    }

    pub fn model(mut self, model: String) -> Self {
        self.settings.advice.model = model;
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.settings.strength.debounce_ms = ms;
        self
    }

    pub fn build(self) -> Result<Settings> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}
