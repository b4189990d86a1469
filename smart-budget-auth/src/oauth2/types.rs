//! Core OAuth2 types and configuration
//!
//! This module defines the foundational types for the Google sign-in flow:
//! provider configuration, tokens, profile claims and errors.

use oauth2::basic::BasicClient;
use oauth2::{EndpointNotSet, EndpointSet};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Google authorization endpoint
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Google token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google user-info endpoint
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Type alias for a configured OAuth2 client with auth and token endpoints set
///
/// The type parameters indicate which endpoints are configured:
/// - `EndpointSet` for `HasAuthUrl`
/// - `EndpointNotSet` for `HasDeviceAuthUrl`
/// - `EndpointNotSet` for `HasIntrospectionUrl`
/// - `EndpointNotSet` for `HasRevocationUrl`
/// - `EndpointSet` for `HasTokenUrl`
pub type ConfiguredClient = BasicClient<
    EndpointSet,    // HasAuthUrl
    EndpointNotSet, // HasDeviceAuthUrl
    EndpointNotSet, // HasIntrospectionUrl
    EndpointNotSet, // HasRevocationUrl
    EndpointSet,    // HasTokenUrl
>;

/// Configuration for the OAuth2 provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// OAuth2 client ID
    pub client_id: String,
    /// OAuth2 client secret
    pub client_secret: String,
    /// Redirect URI (callback URL)
    pub redirect_uri: String,
    /// OAuth2 scopes to request
    pub scopes: Vec<String>,
    /// Authorization endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    /// Token endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    /// UserInfo endpoint override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub userinfo_url: Option<String>,
}

impl ProviderConfig {
    /// Empty credentials with Google's profile and email scopes
    #[must_use]
    pub fn google_defaults() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            scopes: vec![
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
                "https://www.googleapis.com/auth/userinfo.profile".to_string(),
            ],
            auth_url: None,
            token_url: None,
            userinfo_url: None,
        }
    }

    /// Authorization endpoint, falling back to Google's
    #[must_use]
    pub fn auth_url(&self) -> &str {
        self.auth_url.as_deref().unwrap_or(GOOGLE_AUTH_URL)
    }

    /// Token endpoint, falling back to Google's
    #[must_use]
    pub fn token_url(&self) -> &str {
        self.token_url.as_deref().unwrap_or(GOOGLE_TOKEN_URL)
    }

    /// UserInfo endpoint, falling back to Google's
    #[must_use]
    pub fn userinfo_url(&self) -> &str {
        self.userinfo_url.as_deref().unwrap_or(GOOGLE_USERINFO_URL)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::google_defaults()
    }
}

/// OAuth2 access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Access token
    pub access_token: String,
    /// Refresh token (present when offline access was granted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// When the token expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<SystemTime>,
    /// OAuth2 scopes granted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl OAuthToken {
    /// Check if the access token has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires| SystemTime::now() > expires)
    }
}

/// Profile claims returned by the user-info endpoint
///
/// Decoded verbatim. Missing fields are left at their zero value and unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    /// Email address
    pub email: String,
    /// Whether the provider has verified the email
    pub verified_email: bool,
    /// Display name
    pub name: String,
    /// Avatar/profile picture URL
    pub picture: String,
}

/// OAuth2 errors
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// A configured endpoint is not a valid URL
    #[error("Invalid {endpoint} URL: {reason}")]
    InvalidUrl {
        /// Which endpoint was rejected
        endpoint: &'static str,
        /// Parser message
        reason: String,
    },

    /// The outbound HTTP client could not be created
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Authorization code exchange failed
    #[error("Failed to exchange authorization code for token: {0}")]
    TokenExchangeFailed(String),

    /// Failed to fetch user info
    #[error("Failed to fetch user information: {0}")]
    UserInfoFailed(String),
}
