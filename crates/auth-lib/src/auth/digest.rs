// ============================
// crates/auth-lib/src/auth/digest.rs
// ============================
//! Password digests.
//!
//! Passwords are reduced to an unsalted SHA-256 hex string. Equal passwords
//! always produce equal digests, across users and over time. This is only
//! fit for the mock credential store; real credential storage needs a salted,
//! slow KDF.
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Length of a digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

/// Digest a password into 64 lowercase hex characters
pub fn digest_password(plain: &str) -> String {
    format!("{:x}", Sha256::digest(plain.as_bytes()))
}

/// Digest a password and zeroize the original
pub fn digest_password_secure(plain: &mut String) -> String {
    let digest = digest_password(plain);
    plain.zeroize();
    digest
}

/// Compare a password against a stored digest
pub fn matches_digest(digest: &str, plain: &str) -> bool {
    digest_password(plain) == digest
}
