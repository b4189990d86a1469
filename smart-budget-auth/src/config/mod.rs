//! Configuration management for smart-budget-auth
//!
//! Configuration is assembled from layered sources with clear precedence:
//!
//! 1. Environment variables (highest priority)
//! 2. An optional TOML file passed to [`AuthConfig::load_from`]
//! 3. Hardcoded defaults (fallback)
//!
//! # Environment Variables
//!
//! | Variable               | Field                       |
//! |------------------------|-----------------------------|
//! | `GOOGLE_CLIENT_ID`     | `google.client_id`          |
//! | `GOOGLE_CLIENT_SECRET` | `google.client_secret`      |
//! | `GOOGLE_REDIRECT_URL`  | `google.redirect_uri`       |
//! | `SESSION_KEY`          | `session.key` (base64)      |
//! | `SESSION_SECURE`       | `session.secure`            |
//!
//! Missing OAuth credentials are not an error here. They stay empty and surface
//! as provider failures when a login is attempted.
//!
//! # Example Configuration
//!
//! ```toml
//! login_path = "/login"
//!
//! [google]
//! client_id = "1234.apps.googleusercontent.com"
//! client_secret = "secret"
//! redirect_uri = "http://localhost:3000/auth/google/callback"
//!
//! [session]
//! cookie_name = "smart-budget-session"
//! max_age_secs = 604800
//! secure = false
//! same_site = "lax"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use smart_budget_auth::config::AuthConfig;
//!
//! # fn example() -> Result<(), smart_budget_auth::config::ConfigError> {
//! let config = AuthConfig::from_env()?;
//! let key = config.session.resolve_key()?;
//! # Ok(())
//! # }
//! ```

use axum_extra::extract::cookie::{Key, SameSite};
use base64::{engine::general_purpose::STANDARD, Engine};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::oauth2::ProviderConfig;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "smart-budget-session";

/// Default session lifetime: 7 days
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 86400 * 7;

/// Minimum decoded length of `SESSION_KEY` in bytes (256 bits)
pub const MIN_SESSION_KEY_LEN: usize = 32;

/// Environment variables read by [`AuthConfig::from_env`]
const ENV_KEYS: [&str; 5] = [
    "GOOGLE_CLIENT_ID",
    "GOOGLE_CLIENT_SECRET",
    "GOOGLE_REDIRECT_URL",
    "SESSION_KEY",
    "SESSION_SECURE",
];

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A provider failed to extract
    #[error("Failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    /// `SESSION_KEY` is not valid base64
    #[error("Session key is not valid base64: {0}")]
    KeyEncoding(#[from] base64::DecodeError),

    /// `SESSION_KEY` decodes to fewer than 256 bits
    #[error("Session key must be at least {MIN_SESSION_KEY_LEN} bytes, got {0}")]
    KeyTooShort(usize),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}

/// Cookie SameSite policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    /// Strict SameSite policy
    Strict,
    /// Lax SameSite policy (recommended)
    #[default]
    Lax,
    /// None SameSite policy (requires secure cookies)
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => Self::Strict,
            SameSitePolicy::Lax => Self::Lax,
            SameSitePolicy::None => Self::None,
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Cookie name for the session
    pub cookie_name: String,

    /// Cookie path
    pub cookie_path: String,

    /// Session maximum age in seconds
    pub max_age_secs: i64,

    /// HTTP-only cookie (recommended: true)
    pub http_only: bool,

    /// Secure cookie (HTTPS only). Off by default; enable behind TLS.
    pub secure: bool,

    /// Cookie SameSite policy
    pub same_site: SameSitePolicy,

    /// Base64-encoded key material for cookie encryption
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            cookie_path: "/".to_string(),
            max_age_secs: DEFAULT_SESSION_MAX_AGE_SECS,
            http_only: true,
            secure: false,
            same_site: SameSitePolicy::Lax,
            key: None,
        }
    }
}

impl SessionSettings {
    /// Resolve the cookie encryption key
    ///
    /// Decodes the configured base64 key material. When no key is configured a
    /// random one is generated and a warning is logged: every restart then
    /// invalidates all existing sessions, and separate instances cannot read each
    /// other's cookies.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the key is not valid base64 or is shorter than
    /// 256 bits.
    pub fn resolve_key(&self) -> Result<Key, ConfigError> {
        let Some(encoded) = self.key.as_deref() else {
            tracing::warn!(
                "Using randomly generated session key. Set SESSION_KEY for production; \
                 sessions will not survive a restart or be shared between instances."
            );
            let mut master = [0u8; MIN_SESSION_KEY_LEN];
            OsRng.fill_bytes(&mut master);
            return Ok(Key::derive_from(&master));
        };

        let master = STANDARD.decode(encoded.trim())?;
        if master.len() < MIN_SESSION_KEY_LEN {
            return Err(ConfigError::KeyTooShort(master.len()));
        }

        Ok(Key::derive_from(&master))
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Google OAuth2 client settings
    #[serde(default)]
    pub google: ProviderConfig,

    /// Session cookie settings
    #[serde(default)]
    pub session: SessionSettings,

    /// Where unauthenticated requests are redirected
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_login_path() -> String {
    "/login".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            google: ProviderConfig::google_defaults(),
            session: SessionSettings::default(),
            login_path: default_login_path(),
        }
    }
}

/// Raw environment overrides, all optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvOverrides {
    google_client_id: Option<String>,
    google_client_secret: Option<String>,
    google_redirect_url: Option<String>,
    session_key: Option<String>,
    session_secure: Option<bool>,
}

impl AuthConfig {
    /// Load configuration from defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an environment variable has the wrong type
    /// (for example a non-boolean `SESSION_SECURE`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or a value has the
    /// wrong type.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .extract()?;
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        let env: EnvOverrides = Figment::from(Env::raw().only(&ENV_KEYS)).extract()?;

        if let Some(client_id) = env.google_client_id {
            self.google.client_id = client_id;
        }
        if let Some(client_secret) = env.google_client_secret {
            self.google.client_secret = client_secret;
        }
        if let Some(redirect_uri) = env.google_redirect_url {
            self.google.redirect_uri = redirect_uri;
        }
        if let Some(key) = env.session_key.filter(|k| !k.is_empty()) {
            self.session.key = Some(key);
        }
        if let Some(secure) = env.session_secure {
            self.session.secure = secure;
        }

        Ok(())
    }
}
