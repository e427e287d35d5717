//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification, temporary passwords.
//! - [`jwt`] -- session token generation and validation.
//! - [`cookie`] -- session cookie formatting and parsing.
//! - [`reset`] -- password-reset token generation and hashing.

pub mod cookie;
pub mod jwt;
pub mod password;
pub mod reset;
