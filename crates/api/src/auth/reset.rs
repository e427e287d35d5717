//! Password-reset tokens.
//!
//! The plaintext token goes out in the reset link; only its SHA-256 hash is
//! stored, so a database leak does not expose usable links.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Reset links stay valid for this many hours.
pub const RESET_TOKEN_TTL_HOURS: i64 = 24;

/// Generate a random reset token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`.
pub fn generate_reset_token() -> (String, String) {
    let bytes: [u8; 32] = rand::rng().random();
    let plaintext: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_reset_token(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a reset token.
pub fn hash_reset_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_hash_matches() {
        let (plaintext, hash) = generate_reset_token();
        assert_eq!(plaintext.len(), 64);
        assert_eq!(hash, hash_reset_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert_ne!(plaintext, hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_reset_token();
        let (b, _) = generate_reset_token();
        assert_ne!(a, b);
    }
}
