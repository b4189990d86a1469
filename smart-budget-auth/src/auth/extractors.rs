//! Authentication extractors for Axum handlers
//!
//! Provides extractors for reading the signed-in user's session claims in
//! request handlers.
//!
//! # Examples
//!
//! ## Requiring authentication
//!
//! ```rust,no_run
//! use smart_budget_auth::auth::Authenticated;
//! use axum::response::IntoResponse;
//!
//! async fn protected_handler(
//!     Authenticated(session): Authenticated,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", session.email)
//! }
//! ```
//!
//! ## Optional authentication
//!
//! ```rust,no_run
//! use smart_budget_auth::auth::OptionalAuth;
//! use axum::response::IntoResponse;
//!
//! async fn optional_handler(
//!     OptionalAuth(session): OptionalAuth,
//! ) -> impl IntoResponse {
//!     match session {
//!         Some(session) => format!("Hello, {}!", session.name),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use crate::auth::session::SessionRecord;
use crate::state::AuthState;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::LOCATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

/// Authenticated session extractor for protected routes
///
/// Rejects requests without an authenticated session with a 302 redirect to the
/// configured login path.
pub struct Authenticated(pub SessionRecord);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthenticationError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AuthState::from_ref(state);

        match app_state.sessions().load(&parts.headers) {
            Ok(record) if record.authenticated => Ok(Self(record)),
            Ok(_) => Err(AuthenticationError::NotAuthenticated(
                app_state.config().login_path.clone(),
            )),
            Err(e) => {
                tracing::debug!(error = %e, "No usable session for protected handler");
                Err(AuthenticationError::NotAuthenticated(
                    app_state.config().login_path.clone(),
                ))
            }
        }
    }
}

/// Optional authentication extractor
///
/// Yields `Some(record)` for authenticated sessions and `None` otherwise. Never
/// rejects.
pub struct OptionalAuth(pub Option<SessionRecord>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AuthState::from_ref(state);

        let record = app_state
            .sessions()
            .load(&parts.headers)
            .ok()
            .filter(|record| record.authenticated);

        Ok(Self(record))
    }
}

/// Authentication errors for extractors
#[derive(Debug)]
pub enum AuthenticationError {
    /// No authenticated session; carries the login path to redirect to
    NotAuthenticated(String),
}

impl IntoResponse for AuthenticationError {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthenticated(login_path) => {
                (StatusCode::FOUND, [(LOCATION, login_path)]).into_response()
            }
        }
    }
}
