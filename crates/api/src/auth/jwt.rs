//! Session token generation and validation.
//!
//! Session tokens are HS256-signed JWTs containing a [`Claims`] payload. They
//! travel in the session cookie, or as a bearer token for non-browser clients.

use ingetech_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's type id (1 = administrator).
    pub user_type_id: DbId,
    /// Display name of the user's type (e.g. `"Administrador"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in hours (default: 12).
    pub session_expiry_hours: i64,
    /// Session lifetime in days when "remember me" is ticked (default: 30).
    pub remember_me_days: i64,
}

/// Default session expiry in hours.
const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 12;
/// Default "remember me" expiry in days.
const DEFAULT_REMEMBER_ME_DAYS: i64 = 30;

impl JwtConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `SESSION_EXPIRY_HOURS`   | no       | `12`    |
    /// | `SESSION_REMEMBER_DAYS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_expiry_hours: i64 = std::env::var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_HOURS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_HOURS must be a valid i64");

        let remember_me_days: i64 = std::env::var("SESSION_REMEMBER_DAYS")
            .unwrap_or_else(|_| DEFAULT_REMEMBER_ME_DAYS.to_string())
            .parse()
            .expect("SESSION_REMEMBER_DAYS must be a valid i64");

        Self {
            secret,
            session_expiry_hours,
            remember_me_days,
        }
    }

    /// Session lifetime in seconds for the given "remember me" choice.
    pub fn session_lifetime_secs(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_me_days * 24 * 60 * 60
        } else {
            self.session_expiry_hours * 60 * 60
        }
    }
}

/// Generate an HS256 session token valid for `lifetime_secs`.
pub fn generate_session_token(
    user_id: DbId,
    user_type_id: DbId,
    role: &str,
    lifetime_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        user_type_id,
        role: role.to_string(),
        exp: now + lifetime_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
