//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables and the
//! authentication configuration loaded at startup.

use crate::common::error::GateError;

/// Get an environment variable, parsing to a specific type
///
/// Returns the default if the variable is not set. Logs a warning and
/// returns the default if the value fails to parse.
///
/// # Arguments
/// * `name` - The environment variable name
/// * `default` - The default value
///
/// # Returns
/// The parsed value or the default
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(val) => match val.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(
                    "Environment variable '{}' has invalid value '{}', using default",
                    name,
                    val
                );
                default
            }
        },
        Err(_) => default,
    }
}

/// Authentication configuration
///
/// The JWT secret is loaded once at startup and must never appear in
/// logs or responses.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key used to sign and verify access tokens
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    /// Load the authentication configuration from the environment
    ///
    /// # Errors
    /// Returns an error if `AUTHGATE_JWT_SECRET` is not set or empty.
    pub fn from_env() -> Result<Self, GateError> {
        let jwt_secret = std::env::var("AUTHGATE_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                GateError::Internal(
                    "AUTHGATE_JWT_SECRET environment variable is required".to_string(),
                )
            })?;
        let token_ttl_minutes = get_env_parse("AUTHGATE_TOKEN_TTL_MINUTES", 30i64);

        Ok(Self {
            jwt_secret,
            token_ttl_minutes,
        })
    }

    /// Fixed configuration for tests
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            jwt_secret: "test-secret-key".to_string(),
            token_ttl_minutes: 30,
        }
    }
}
