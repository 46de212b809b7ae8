// ==========================
// tests/unit/digest_tests.rs
// ==========================
//! Unit tests for the password digest
use secureauth_lib::auth::{digest_password, matches_digest, DIGEST_HEX_LEN};

#[test]
fn test_digest_deterministic_and_fixed_length() {
    for password in ["secret123", "", "pässwörd", "a very long passphrase with spaces"] {
        let first = digest_password(password);
        assert_eq!(first, digest_password(password));
        assert_eq!(first.len(), DIGEST_HEX_LEN);
        assert_ne!(first, password);
    }
}

#[test]
fn test_digest_is_unsalted() {
    // same password for two users yields the same digest
    assert_eq!(digest_password("shared"), digest_password("shared"));
    assert!(matches_digest(&digest_password("shared"), "shared"));
}

#[test]
fn test_no_collisions_in_corpus() {
    let corpus: Vec<String> = (0..500).map(|i| format!("password-{i}")).collect();
    let mut digests: Vec<String> = corpus.iter().map(|p| digest_password(p)).collect();
    digests.sort();
    digests.dedup();
    assert_eq!(digests.len(), corpus.len());
}
