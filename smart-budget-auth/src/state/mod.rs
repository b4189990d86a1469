//! Application state management
//!
//! [`AuthState`] bundles everything the sign-in flow needs: configuration, the
//! OAuth2 provider and the session codec. It is built once at startup and handed
//! to axum with `.with_state()`; clones share the same `Arc`s.

use crate::{
    auth::SessionCodec,
    config::AuthConfig,
    error::AuthError,
    oauth2::{GoogleProvider, StateToken},
};
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use std::sync::Arc;

/// Application state for smart-budget-auth
///
/// # Example
///
/// ```rust,no_run
/// use smart_budget_auth::{config::AuthConfig, state::AuthState};
///
/// # fn example() -> Result<(), smart_budget_auth::error::AuthError> {
/// let state = AuthState::new(AuthConfig::from_env()?)?;
///
/// let app: axum::Router = axum::Router::new()
///     .route("/", axum::routing::get(|| async { "Hello!" }))
///     .with_state(state);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct AuthState {
    config: Arc<AuthConfig>,
    provider: Arc<GoogleProvider>,
    sessions: Arc<SessionCodec>,
}

impl AuthState {
    /// Create state from configuration, resolving the session key
    ///
    /// # Errors
    ///
    /// Returns error if the session key is malformed or a provider URL is invalid
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let key = config.session.resolve_key()?;
        Self::with_key(config, key)
    }

    /// Create state with an explicit cookie key
    ///
    /// # Errors
    ///
    /// Returns error if a provider URL is invalid
    pub fn with_key(config: AuthConfig, key: Key) -> Result<Self, AuthError> {
        let provider = GoogleProvider::new(&config.google)?;
        let sessions = SessionCodec::new(key, config.session.clone());

        Ok(Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            sessions: Arc::new(sessions),
        })
    }

    /// Get configuration reference
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get the OAuth2 provider
    #[must_use]
    pub fn provider(&self) -> &GoogleProvider {
        &self.provider
    }

    /// Get the session codec
    #[must_use]
    pub fn sessions(&self) -> &SessionCodec {
        &self.sessions
    }

    pub(crate) fn shared_sessions(&self) -> Arc<SessionCodec> {
        Arc::clone(&self.sessions)
    }

    /// Start a login attempt
    ///
    /// Returns the fresh state token, which the caller must keep until the
    /// callback, and the provider URL to redirect the browser to.
    #[must_use]
    pub fn begin_login(&self) -> (StateToken, String) {
        let state = StateToken::generate();
        let url = self.provider.login_url(&state);
        (state, url)
    }

    /// Finish a login after the callback's `state` has been verified
    ///
    /// Exchanges the code, fetches the profile and writes the session cookie.
    /// Nothing is written if any step fails.
    ///
    /// # Errors
    ///
    /// Returns the provider error unchanged (wrapped in [`AuthError::OAuth`]) or
    /// a session encoding error.
    pub async fn complete_login(
        &self,
        headers: &HeaderMap,
        code: &str,
    ) -> Result<PrivateCookieJar, AuthError> {
        let token = self.provider.exchange_code(code).await?;
        let user = self.provider.fetch_user_info(&token).await?;
        let jar = self.sessions.save(headers, &user)?;

        tracing::info!(
            email = %user.email,
            verified_email = user.verified_email,
            "User signed in"
        );

        Ok(jar)
    }

    /// Log the current session out
    ///
    /// # Errors
    ///
    /// Returns error if the cleared record cannot be encoded
    pub fn logout(&self, headers: &HeaderMap) -> Result<PrivateCookieJar, AuthError> {
        let jar = self.sessions.clear(headers)?;
        tracing::info!("User signed out");
        Ok(jar)
    }
}
