use std::fmt::Display;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed to call the API with credentials.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// Public address of the front end, without a trailing slash. Used to
    /// build password reset links.
    pub public_base_url: String,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `COOKIE_SECURE`        | `false`                    |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000`    |
    ///
    /// Session settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics when a numeric or boolean variable does not parse.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000),
            cors_origins: split_origins(&env_or("CORS_ORIGINS", "http://localhost:5173")),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            cookie_secure: env_parse("COOKIE_SECURE", false),
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
