//! smart-budget-auth: Google single-sign-on for axum applications
//!
//! Signs users in through Google's OAuth2 authorization-code flow and keeps the
//! result in an encrypted, HTTP-only session cookie that gates protected routes.
//!
//! # Components
//!
//! - [`config`]: client credentials, redirect URL and session key from the
//!   environment (optionally layered over a TOML file)
//! - [`oauth2`]: state tokens, authorization URL, code exchange, user info
//! - [`auth`]: the typed session record and its cookie codec
//! - [`middleware`]: the gate that redirects anonymous requests to `/login`
//! - [`state`]: the shared bundle handed to axum
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use smart_budget_auth::prelude::*;
//! use axum::{middleware, routing::get, Router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     smart_budget_auth::observability::init()?;
//!
//!     let state = AuthState::new(AuthConfig::from_env()?)?;
//!
//!     let gate = middleware::from_fn_with_state(state.clone(), AuthMiddleware::handle);
//!     let app = Router::new()
//!         .route("/", get(index))
//!         .route_layer(gate)
//!         .with_state(state);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//!
//! async fn index(Authenticated(session): Authenticated) -> String {
//!     format!("Hello, {}!", session.name)
//! }
//! ```
//!
//! The hosting application owns the `/login` page and the OAuth2 callback
//! route; see the `sso_server` example.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod oauth2;
pub mod observability;
pub mod state;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use smart_budget_auth::prelude::*;
    //! ```

    // Authentication extractors and session types
    pub use crate::auth::{Authenticated, OptionalAuth, SessionCodec, SessionError, SessionRecord};

    // Configuration
    pub use crate::config::{AuthConfig, SameSitePolicy, SessionSettings};

    // Error types
    pub use crate::error::AuthError;

    // Route protection
    pub use crate::middleware::AuthMiddleware;

    // OAuth2 authentication
    pub use crate::oauth2::{
        GoogleProvider, OAuthError, OAuthToken, ProviderConfig, StateToken, UserInfo,
    };

    // Application state
    pub use crate::state::AuthState;
}
