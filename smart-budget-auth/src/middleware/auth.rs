//! Authentication middleware for protecting routes
//!
//! Requests without an authenticated session are answered with a `302 Found`
//! redirect to the login page and never reach the protected handler.
//!
//! # Example
//!
//! ```rust,no_run
//! use smart_budget_auth::{config::AuthConfig, middleware::AuthMiddleware, state::AuthState};
//! use axum::{Router, routing::get, middleware};
//!
//! # fn example() -> Result<(), smart_budget_auth::error::AuthError> {
//! let state = AuthState::new(AuthConfig::from_env()?)?;
//!
//! // Login path taken from configuration (`/login` by default)
//! let app: Router = Router::new()
//!     .route("/budget", get(|| async { "Protected content" }))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), AuthMiddleware::handle))
//!     .with_state(state.clone());
//!
//! // Custom login path
//! let gate = AuthMiddleware::from_state(&state).with_login_path("/auth/login");
//! let app: Router = Router::new()
//!     .route("/budget", get(|| async { "Protected content" }))
//!     .route_layer(middleware::from_fn(move |req, next| {
//!         gate.clone().handle_with_config(req, next)
//!     }));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::LOCATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{auth::SessionCodec, state::AuthState};

/// Middleware that requires authentication for routes
///
/// Checks the session cookie once per request. No result is cached between
/// requests.
#[derive(Clone, Debug)]
pub struct AuthMiddleware {
    sessions: Arc<SessionCodec>,
    login_path: String,
}

impl AuthMiddleware {
    /// Create a gate over the given codec, redirecting to `/login`
    #[must_use]
    pub fn new(sessions: SessionCodec) -> Self {
        Self {
            sessions: Arc::new(sessions),
            login_path: "/login".to_string(),
        }
    }

    /// Create a gate from application state, using its configured login path
    #[must_use]
    pub fn from_state(state: &AuthState) -> Self {
        Self {
            sessions: state.shared_sessions(),
            login_path: state.config().login_path.clone(),
        }
    }

    /// Override the login path
    ///
    /// # Example
    ///
    /// ```rust
    /// use axum_extra::extract::cookie::Key;
    /// use smart_budget_auth::{
    ///     auth::SessionCodec, config::SessionSettings, middleware::AuthMiddleware,
    /// };
    ///
    /// let codec = SessionCodec::new(Key::generate(), SessionSettings::default());
    /// let gate = AuthMiddleware::new(codec).with_login_path("/auth/login");
    /// assert_eq!(gate.login_path(), "/auth/login");
    /// ```
    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// Where unauthenticated requests are sent
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Middleware handler for `middleware::from_fn_with_state`
    ///
    /// # Errors
    ///
    /// Returns [`AuthMiddlewareError::RedirectToLogin`] if the request has no
    /// authenticated session.
    pub async fn handle(
        State(state): State<AuthState>,
        request: Request,
        next: Next,
    ) -> Result<Response, AuthMiddlewareError> {
        Self::from_state(&state)
            .handle_with_config(request, next)
            .await
    }

    /// Middleware handler using this instance's codec and login path
    ///
    /// # Errors
    ///
    /// Returns [`AuthMiddlewareError::RedirectToLogin`] if the request has no
    /// authenticated session.
    pub async fn handle_with_config(
        self,
        request: Request,
        next: Next,
    ) -> Result<Response, AuthMiddlewareError> {
        if !self.sessions.is_authenticated(request.headers()) {
            tracing::debug!(
                path = %request.uri().path(),
                login_path = %self.login_path,
                "Redirecting unauthenticated request"
            );
            return Err(AuthMiddlewareError::RedirectToLogin(self.login_path));
        }

        Ok(next.run(request).await)
    }
}

/// Authentication middleware errors
#[derive(Debug)]
pub enum AuthMiddlewareError {
    /// Redirect to login page
    ///
    /// Contains the login path to redirect to
    RedirectToLogin(String),
}

impl IntoResponse for AuthMiddlewareError {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(login_path) => {
                (StatusCode::FOUND, [(LOCATION, login_path)]).into_response()
            }
        }
    }
}
