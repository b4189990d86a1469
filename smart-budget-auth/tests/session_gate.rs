//! Integration tests for the route gate
//!
//! Tests the 302-to-login behavior through a real router with axum-test.

use axum::{
    extract::State,
    http::{header::COOKIE, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use axum_test::TestServer;
use chrono::Utc;
use smart_budget_auth::prelude::*;

fn auth_state() -> AuthState {
    AuthState::with_key(AuthConfig::default(), Key::generate()).unwrap()
}

async fn logout(State(state): State<AuthState>, headers: HeaderMap) -> PrivateCookieJar {
    state.logout(&headers).unwrap()
}

fn app(state: AuthState) -> Router {
    let gate = middleware::from_fn_with_state(state.clone(), AuthMiddleware::handle);
    let protected = Router::new()
        .route(
            "/",
            get(|Authenticated(session): Authenticated| async move {
                format!("Hello, {}!", session.name)
            }),
        )
        .route("/budget", get(|| async { "budget" }))
        .route_layer(gate);

    Router::new()
        .route("/login", get(|| async { "login page" }))
        .route("/logout", get(logout))
        .merge(protected)
        .with_state(state)
}

fn ada() -> UserInfo {
    UserInfo {
        email: "ada@example.com".to_string(),
        verified_email: true,
        name: "Ada".to_string(),
        picture: String::new(),
    }
}

/// The `name=value` pair of a Set-Cookie line
fn pair_of(line: &str) -> HeaderValue {
    HeaderValue::from_str(line.split(';').next().unwrap()).unwrap()
}

/// The `name=value` pair of the session cookie a jar would set
fn cookie_pair(jar: impl IntoResponse) -> HeaderValue {
    let response = jar.into_response();
    pair_of(response.headers()["set-cookie"].to_str().unwrap())
}

/// Session cookie for a signed-in Ada
fn signed_in(state: &AuthState) -> HeaderValue {
    cookie_pair(state.sessions().save(&HeaderMap::new(), &ada()).unwrap())
}

/// Session cookie carrying an arbitrary record
fn record_cookie(state: &AuthState, record: &SessionRecord) -> HeaderValue {
    let jar = state.sessions().save_record(&HeaderMap::new(), record);
    cookie_pair(jar.unwrap())
}

#[tokio::test]
async fn test_anonymous_request_redirects_to_login() {
    let server = TestServer::new(app(auth_state())).unwrap();

    for path in ["/", "/budget"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/login");
    }
}

#[tokio::test]
async fn test_login_page_is_not_gated() {
    let server = TestServer::new(app(auth_state())).unwrap();

    let response = server.get("/login").await;

    response.assert_status_ok();
    response.assert_text("login page");
}

#[tokio::test]
async fn test_signed_in_request_reaches_handler() {
    let state = auth_state();
    let cookie = signed_in(&state);
    let server = TestServer::new(app(state)).unwrap();

    let response = server.get("/").add_header(COOKIE, cookie.clone()).await;
    response.assert_status_ok();
    response.assert_text("Hello, Ada!");

    server
        .get("/budget")
        .add_header(COOKIE, cookie)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_cookie_from_another_key_redirects() {
    let other = auth_state();
    let cookie = signed_in(&other);
    let server = TestServer::new(app(auth_state())).unwrap();

    let response = server.get("/").add_header(COOKIE, cookie).await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn test_unauthenticated_record_redirects() {
    let state = auth_state();
    let record = SessionRecord {
        authenticated: false,
        ..SessionRecord::from_user(&ada(), Utc::now().timestamp())
    };
    let cookie = record_cookie(&state, &record);
    let server = TestServer::new(app(state)).unwrap();

    server
        .get("/budget")
        .add_header(COOKIE, cookie)
        .await
        .assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_stale_login_redirects() {
    let state = auth_state();
    let max_age = state.sessions().settings().max_age_secs;
    let record = SessionRecord::from_user(&ada(), Utc::now().timestamp() - max_age - 60);
    let cookie = record_cookie(&state, &record);
    let server = TestServer::new(app(state)).unwrap();

    server
        .get("/budget")
        .add_header(COOKIE, cookie)
        .await
        .assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let state = auth_state();
    let cookie = signed_in(&state);
    let server = TestServer::new(app(state)).unwrap();

    let response = server.get("/logout").add_header(COOKIE, cookie).await;
    response.assert_status_ok();

    let line = response.header("set-cookie");
    let line = line.to_str().unwrap();
    assert!(line.starts_with("smart-budget-session="));
    assert!(line.contains("Max-Age=-1"), "{line}");

    server
        .get("/")
        .add_header(COOKIE, pair_of(line))
        .await
        .assert_status(StatusCode::FOUND);
}
