//! HTTP transport for the OAuth2 token exchange and user-info requests
//!
//! `oauth2` drives a `reqwest::Client` directly, so the provider only needs one
//! client configured the way the token endpoint requires.

/// Build the client used for token and user-info requests
///
/// Redirects are disabled, as the token endpoint must answer directly.
///
/// # Errors
///
/// Returns `reqwest::Error` if the TLS backend cannot be initialised.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
