//! Error types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Crate-level error type
#[derive(Debug, Error)]
pub enum AuthError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// OAuth2 error
    #[error("OAuth2 error: {0}")]
    OAuth(#[from] crate::oauth2::OAuthError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] crate::auth::SessionError),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AuthError {
    /// HTTP status this error maps to
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::OAuth(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Authentication request failed");
        } else {
            tracing::warn!(error = %self, "Authentication request rejected");
        }

        (status, self.to_string()).into_response()
    }
}
