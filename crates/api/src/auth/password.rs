//! Argon2id password hashing, verification, and temporary password generation.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::seq::SliceRandom;
use rand::Rng;

/// Length of generated temporary passwords.
pub const TEMPORARY_PASSWORD_LENGTH: usize = 8;

/// Alphabet for temporary passwords, without look-alikes (`I`, `O`, `l`, `0`, `1`).
const TEMPORARY_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";
const TEMPORARY_UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const TEMPORARY_LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
const TEMPORARY_DIGITS: &[u8] = b"23456789";

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Generate a temporary password.
///
/// Always contains at least one uppercase letter, one lowercase letter and
/// one digit; the rest is drawn from the full alphabet and the result is
/// shuffled.
pub fn generate_temporary_password() -> String {
    let mut rng = rand::rng();
    let mut pick = |set: &[u8]| set[rng.random_range(0..set.len())];

    let mut chars = vec![
        pick(TEMPORARY_UPPER),
        pick(TEMPORARY_LOWER),
        pick(TEMPORARY_DIGITS),
    ];
    while chars.len() < TEMPORARY_PASSWORD_LENGTH {
        chars.push(pick(TEMPORARY_ALPHABET));
    }
    chars.shuffle(&mut rng);

    chars.into_iter().map(char::from).collect()
}
