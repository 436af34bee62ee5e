//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `GateError`は`status_code()`と`external_message()`を提供し、
//! APIバウンダリで1:1にHTTPレスポンスへ変換される。

use axum::http::StatusCode;
use thiserror::Error;

use crate::auth::jwt::TokenError;

/// authgate error type
#[derive(Debug, Error)]
pub enum GateError {
    /// Validation error (duplicate username/email, bad query params)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication error (bad login credentials)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Missing bearer credential on a protected route
    #[error("Missing bearer credential")]
    MissingCredential,

    /// Invalid bearer credential (signature, expiry, format)
    #[error(transparent)]
    InvalidCredential(#[from] TokenError),

    /// Token subject does not resolve to a known user
    #[error("Unknown token subject: {0}")]
    UnknownSubject(String),

    /// Account exists but has been disabled
    #[error("Account is disabled")]
    AccountDisabled,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Password hash error
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GateError {
    /// Returns a safe error message for external clients.
    ///
    /// This message never exposes internal details (signature internals,
    /// SQL text, hash parameters). Use the `Display` implementation for
    /// server logs only.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation error",
            Self::Authentication(_) => "Incorrect username or password",
            Self::MissingCredential => "Not authenticated",
            Self::InvalidCredential(_) => "Could not validate credentials",
            Self::UnknownSubject(_) => "Could not validate credentials",
            Self::AccountDisabled => "Inactive user",
            Self::NotFound(_) => "Not found",
            Self::Database(_) => "Database error",
            Self::PasswordHash(_) => "Internal server error",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            Self::UnknownSubject(_) => StatusCode::UNAUTHORIZED,
            Self::AccountDisabled => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 401レスポンスに`WWW-Authenticate: Bearer`チャレンジを付与すべきか
    pub fn wants_bearer_challenge(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }
}

/// Result type alias
pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let error = GateError::Validation("Username already registered".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_authentication_maps_to_401_with_challenge() {
        let error = GateError::Authentication("bad login".to_string());
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        assert!(error.wants_bearer_challenge());
        assert_eq!(error.external_message(), "Incorrect username or password");
    }

    #[test]
    fn test_credential_errors_map_to_401() {
        assert_eq!(
            GateError::MissingCredential.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GateError::InvalidCredential(TokenError::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GateError::UnknownSubject("ghost".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_disabled_account_maps_to_403_without_challenge() {
        let error = GateError::AccountDisabled;
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
        assert!(!error.wants_bearer_challenge());
        assert_eq!(error.external_message(), "Inactive user");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let error = GateError::Database("UNIQUE constraint failed: users.username".to_string());
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.external_message(), "Database error");
        // 内部向け表示にはフル詳細が残る
        assert!(error.to_string().contains("UNIQUE constraint"));
    }

    #[test]
    fn test_token_error_conversion() {
        let error: GateError = TokenError::Malformed.into();
        assert!(matches!(
            error,
            GateError::InvalidCredential(TokenError::Malformed)
        ));
        assert_eq!(error.external_message(), "Could not validate credentials");
    }
}
