// ============================
// crates/auth-lib/src/auth/token.rs
// ============================
/** Mock session tokens

A token is three base64 segments joined by `.`: a static JWT-style header,
the user record plus an `exp` claim, and a constant placeholder signature.
The signature is not derived from the payload, and decoding never looks at
`exp` or the signature. Tokens are display/session markers only. */
use base64::{
    alphabet,
    engine::{general_purpose::STANDARD, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use chrono::Utc;
use secureauth_common::UserRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default token lifetime written into `exp` (1 hour)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Placeholder signature text, base64-encoded into the third segment
pub const MOCK_SIGNATURE: &str = "mock-signature";

/// Standard alphabet that accepts payloads with or without padding
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Typed view of a token payload
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub user: UserRecord,
    /// Expiry as unix seconds
    pub exp: i64,
}

/// Mint a token for `user` expiring `ttl_secs` from now
pub fn encode(user: &UserRecord, ttl_secs: i64) -> String {
    encode_at(user, ttl_secs, Utc::now().timestamp())
}

/// Mint a token with an explicit issue time (unix seconds)
pub fn encode_at(user: &UserRecord, ttl_secs: i64, now: i64) -> String {
    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let claims = TokenClaims {
        user: user.clone(),
        exp: now.saturating_add(ttl_secs),
    };
    // plain string/number fields, serialization cannot fail
    let payload = serde_json::to_string(&claims).unwrap_or_default();

    format!(
        "{}.{}.{}",
        STANDARD.encode(header.to_string()),
        STANDARD.encode(payload),
        STANDARD.encode(MOCK_SIGNATURE)
    )
}

/// Decode the payload segment into a JSON object.
/// Returns `None` for anything that is not three segments with a
/// base64 JSON object in the middle.
pub fn decode(token: &str) -> Option<Value> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let normalized = segments[1].replace('-', "+").replace('_', "/");
    let bytes = LENIENT.decode(normalized).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    match serde_json::from_str::<Value>(&text).ok()? {
        payload @ Value::Object(_) => Some(payload),
        _ => None,
    }
}

/// Decode the payload into typed claims
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    serde_json::from_value(decode(token)?).ok()
}
