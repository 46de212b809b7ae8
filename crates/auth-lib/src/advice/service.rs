//! Welcome copy and password-strength analysis with static fallbacks.
use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use secureauth_common::PasswordStrength;
use serde_json::{json, Value};
use tracing::{instrument, warn};

use crate::error::AppError;
use crate::metrics::{ADVICE_FALLBACK, ADVICE_REQUEST};

/// Used when the service answers with no text
pub const EMPTY_WELCOME_FALLBACK: &str = "Welcome back! Stay safe online.";

/// Used when the welcome request fails
pub const WELCOME_FALLBACK: &str = "Welcome back! Ensure your security settings are up to date.";

/// Feedback used when strength analysis fails
pub const STRENGTH_FALLBACK_FEEDBACK: &str =
    "Analysis unavailable, but ensure you use special characters.";

/// Score used when strength analysis fails
pub const STRENGTH_FALLBACK_SCORE: f64 = 3.0;

const WELCOME_TEMPERATURE: f32 = 0.7;

/// One text-generation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: Option<f32>,
    /// When set the service must answer with JSON matching this schema
    pub json_schema: Option<Value>,
}

/// Black-box text generator. One request, one response, no retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}

pub fn welcome_prompt(username: &str) -> String {
    format!(
        "Generate a short, professional welcome message for a user named {username} who just \
         logged into their secure dashboard. Include one unique tip about cybersecurity (like \
         MFA, phishing, or password rotation). Keep it under 100 words."
    )
}

pub fn strength_prompt(password: &str) -> String {
    format!(
        "Analyze the strength of the following password and provide a score from 1 to 5 and a \
         brief feedback. Password: \"{password}\""
    )
}

/// Response schema for strength analysis, in the generator's schema dialect
pub fn strength_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "feedback": { "type": "STRING" }
        },
        "required": ["score", "feedback"]
    })
}

pub fn fallback_strength() -> PasswordStrength {
    PasswordStrength {
        score: STRENGTH_FALLBACK_SCORE,
        feedback: STRENGTH_FALLBACK_FEEDBACK.to_string(),
    }
}

/// Supplementary dashboard and form copy. Failures never reach the caller.
#[derive(Clone)]
pub struct AdviceClient {
    generator: Arc<dyn TextGenerator>,
    temperature: f32,
}

impl AdviceClient {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            temperature: WELCOME_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Welcome message with a security tip for `username`
    #[instrument(skip(self))]
    pub async fn welcome_advice(&self, username: &str) -> String {
        match self.try_welcome_advice(username).await {
            Ok(text) if text.is_empty() => EMPTY_WELCOME_FALLBACK.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "welcome advice unavailable, using fallback");
                counter!(ADVICE_FALLBACK, "op" => "welcome").increment(1);
                WELCOME_FALLBACK.to_string()
            }
        }
    }

    /// Score and feedback for `password`
    #[instrument(skip_all)]
    pub async fn analyze_password_strength(&self, password: &str) -> PasswordStrength {
        match self.try_analyze_password_strength(password).await {
            Ok(strength) => strength,
            Err(e) => {
                warn!(error = %e, "strength analysis unavailable, using fallback");
                counter!(ADVICE_FALLBACK, "op" => "strength").increment(1);
                fallback_strength()
            }
        }
    }

    pub async fn try_welcome_advice(&self, username: &str) -> Result<String, AppError> {
        let request = GenerationRequest {
            prompt: welcome_prompt(username),
            temperature: Some(self.temperature),
            json_schema: None,
        };
        self.call(&request).await
    }

    pub async fn try_analyze_password_strength(
        &self,
        password: &str,
    ) -> Result<PasswordStrength, AppError> {
        let request = GenerationRequest {
            prompt: strength_prompt(password),
            temperature: None,
            json_schema: Some(strength_schema()),
        };
        let text = self.call(&request).await?;
        serde_json::from_str(text.trim())
            .map_err(|e| AppError::AdviceService(format!("malformed strength response: {e}")))
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String, AppError> {
        counter!(ADVICE_REQUEST).increment(1);
        self.generator
            .generate(request)
            .await
            .map_err(|e| AppError::AdviceService(e.to_string()))
    }
}
