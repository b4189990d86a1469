//! Google sign-in example
//!
//! Demonstrates:
//! - Configuration loading from the environment
//! - Starting a login with a state token kept in a private cookie
//! - Verifying the callback and writing the session cookie
//! - Gating routes with `AuthMiddleware`
//!
//! Run with:
//!
//! ```text
//! GOOGLE_CLIENT_ID=... GOOGLE_CLIENT_SECRET=... \
//! GOOGLE_REDIRECT_URL=http://127.0.0.1:3000/auth/google/callback \
//! cargo run --example sso_server
//! ```

use axum::{
    extract::{Query, State},
    http::{header::LOCATION, HeaderMap, StatusCode},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::Deserialize;
use smart_budget_auth::{observability, prelude::*};

/// Cookie holding the state token between `/auth/google` and the callback
const STATE_COOKIE: &str = "oauth_state";

/// How long a login attempt may take before its state token is dropped
const STATE_COOKIE_MAX_AGE_MINS: i64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init()?;

    let config = AuthConfig::from_env()?;
    if config.google.client_id.is_empty() {
        tracing::warn!("GOOGLE_CLIENT_ID is not set; Google will reject the login");
    }

    let state = AuthState::new(config)?;

    let gate = middleware::from_fn_with_state(state.clone(), AuthMiddleware::handle);
    let protected = Router::new().route("/", get(index)).route_layer(gate);

    let app = Router::new()
        .route("/login", get(login_page))
        .route("/auth/google", get(start_login))
        .route("/auth/google/callback", get(callback))
        .route("/logout", get(logout))
        .merge(protected)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Server listening on http://127.0.0.1:3000");

    axum::serve(listener, app).await?;

    Ok(())
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

async fn login_page(OptionalAuth(session): OptionalAuth) -> Response {
    if session.is_some() {
        return found("/");
    }

    Html(
        "<!DOCTYPE html>
<html>
<head><title>Smart Budget - Sign in</title></head>
<body>
    <h1>Smart Budget</h1>
    <a href=\"/auth/google\">Sign in with Google</a>
</body>
</html>",
    )
    .into_response()
}

/// Redirect to Google, remembering the state token for the callback
async fn start_login(State(state): State<AuthState>, headers: HeaderMap) -> Response {
    let (token, url) = state.begin_login();

    let cookie = Cookie::build((STATE_COOKIE, token.as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config().session.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(STATE_COOKIE_MAX_AGE_MINS));
    let jar = state.sessions().jar(&headers).add(cookie);

    tracing::debug!("Redirecting to Google for sign-in");
    (jar, found(&url)).into_response()
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

async fn callback(
    State(state): State<AuthState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<(PrivateCookieJar, Response), AuthError> {
    if let Some(error) = params.error {
        return Err(AuthError::BadRequest(format!("Google returned {error}")));
    }

    let expected = state
        .sessions()
        .jar(&headers)
        .get(STATE_COOKIE)
        .map(|cookie| StateToken::from_value(cookie.value()))
        .ok_or_else(|| AuthError::Forbidden("no login in progress".to_string()))?;

    let returned = params.state.unwrap_or_default();
    if !expected.matches(&returned) {
        return Err(AuthError::Forbidden("state mismatch".to_string()));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AuthError::BadRequest("missing authorization code".to_string()))?;

    let jar = state
        .complete_login(&headers, &code)
        .await?
        .remove(Cookie::build(STATE_COOKIE).path("/"));

    Ok((jar, found("/")))
}

async fn logout(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<(PrivateCookieJar, Response), AuthError> {
    let jar = state.logout(&headers)?;
    Ok((jar, found(&state.config().login_path)))
}

async fn index(Authenticated(session): Authenticated) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>
<html>
<head><title>Smart Budget</title></head>
<body>
    <h1>Welcome, {}</h1>
    <p>Signed in as {}</p>
    <a href=\"/logout\">Sign out</a>
</body>
</html>",
        session.name, session.email
    ))
}
