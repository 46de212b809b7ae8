// ============================
// crates/auth-lib/src/advice/mod.rs
// ============================
//! AI-generated supplementary copy.

pub mod client;
pub mod gemini;
pub mod service;
pub mod strength;

pub use gemini::GeminiGenerator;
pub use service::{
    fallback_strength, AdviceClient, GenerationRequest, TextGenerator, EMPTY_WELCOME_FALLBACK,
    STRENGTH_FALLBACK_FEEDBACK, WELCOME_FALLBACK,
};
pub use strength::{StrengthMonitor, StrengthReading};
