// ============================
// crates/auth-lib/src/auth/mod.rs
// ============================
//! Mock authentication module.

pub mod digest;
pub mod session;
pub mod token;
mod service;
mod service_impl;

pub use digest::{digest_password, digest_password_secure, matches_digest, DIGEST_HEX_LEN};
pub use session::{new_user_id, SessionController, USER_ID_LEN};
pub use token::{decode, decode_claims, encode, TokenClaims, DEFAULT_TOKEN_TTL_SECS};
pub use service::{AuthForm, AuthService};
