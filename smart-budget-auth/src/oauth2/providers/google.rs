//! Google OAuth2 provider implementation
//!
//! Drives the authorization-code flow against Google: builds the consent URL,
//! exchanges the returned code for a token, and reads the profile claims from
//! the user-info endpoint.

use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};

use crate::oauth2::http::build_client;
use crate::oauth2::state::StateToken;
use crate::oauth2::types::{ConfiguredClient, OAuthError, OAuthToken, ProviderConfig, UserInfo};

/// Google OAuth2 provider
#[derive(Debug)]
pub struct GoogleProvider {
    client: ConfiguredClient,
    /// Reusable HTTP client for token and userinfo requests
    http_client: reqwest::Client,
    scopes: Vec<String>,
    userinfo_url: String,
}

impl GoogleProvider {
    /// Create a new Google OAuth2 provider
    ///
    /// Empty credentials are accepted; the provider rejects them at login time.
    ///
    /// # Errors
    ///
    /// Returns error if an endpoint or the redirect URI is not a valid URL, or
    /// if the HTTP client cannot be built
    pub fn new(config: &ProviderConfig) -> Result<Self, OAuthError> {
        let auth_url = AuthUrl::new(config.auth_url().to_string())
            .map_err(|e| invalid_url("auth", &e))?;
        let token_url = TokenUrl::new(config.token_url().to_string())
            .map_err(|e| invalid_url("token", &e))?;

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url);

        let client = if config.redirect_uri.is_empty() {
            tracing::warn!("GOOGLE_REDIRECT_URL is not set; the provider will reject logins");
            client
        } else {
            let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
                .map_err(|e| invalid_url("redirect", &e))?;
            client.set_redirect_uri(redirect_url)
        };

        let http_client = build_client()?;

        Ok(Self {
            client,
            http_client,
            scopes: config.scopes.clone(),
            userinfo_url: config.userinfo_url().to_string(),
        })
    }

    /// Build the authorization URL for one login attempt
    ///
    /// The URL carries the client ID, redirect URI, requested scopes, the given
    /// state token verbatim, and `access_type=offline` so that Google issues a
    /// refresh token.
    #[must_use]
    pub fn login_url(&self, state: &StateToken) -> String {
        let state = state.as_str().to_string();
        let mut request = self.client.authorize_url(move || CsrfToken::new(state));

        for scope in &self.scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, _csrf_state) = request.add_extra_param("access_type", "offline").url();

        auth_url.to_string()
    }

    /// Exchange authorization code for access token
    ///
    /// One POST to the token endpoint, no retry.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects the code
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, OAuthError> {
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| OAuthError::TokenExchangeFailed(describe_token_error(&e)))?;

        tracing::debug!(
            has_refresh_token = token_response.refresh_token().is_some(),
            "Exchanged authorization code"
        );

        Ok(OAuthToken {
            access_token: token_response.access_token().secret().clone(),
            refresh_token: token_response.refresh_token().map(|t| t.secret().clone()),
            token_type: "Bearer".to_string(),
            expires_at: token_response
                .expires_in()
                .map(|duration| std::time::SystemTime::now() + duration),
            scopes: token_response
                .scopes()
                .map(|scopes| scopes.iter().map(|s| s.to_string()).collect()),
        })
    }

    /// Fetch user information using access token
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the endpoint answers with a
    /// non-success status, or the body is not JSON
    pub async fn fetch_user_info(&self, token: &OAuthToken) -> Result<UserInfo, OAuthError> {
        let response = self
            .http_client
            .get(&self.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::UserInfoFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OAuthError::UserInfoFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| OAuthError::UserInfoFailed(format!("Failed to parse JSON: {e}")))
    }
}

fn invalid_url(endpoint: &'static str, err: &oauth2::url::ParseError) -> OAuthError {
    OAuthError::InvalidUrl {
        endpoint,
        reason: err.to_string(),
    }
}

/// Render a token error including the provider's error code when there is one
fn describe_token_error<RE, TE>(err: &oauth2::RequestTokenError<RE, TE>) -> String
where
    RE: std::error::Error + 'static,
    TE: oauth2::ErrorResponse + 'static,
{
    match err {
        oauth2::RequestTokenError::ServerResponse(response) => {
            format!("provider rejected the code: {response}")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ProviderConfig {
        ProviderConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_login_url_carries_state_and_offline_access() {
        let provider = GoogleProvider::new(&test_config()).unwrap();
        let state = StateToken::generate();

        let url = provider.login_url(&state);
        let parsed = reqwest::Url::parse(&url).unwrap();
        let query = |name: &str| {
            parsed
                .query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/auth"));
        assert_eq!(query("state").as_deref(), Some(state.as_str()));
        assert_eq!(query("access_type").as_deref(), Some("offline"));
        assert_eq!(query("client_id").as_deref(), Some("test-client-id"));
        assert_eq!(query("response_type").as_deref(), Some("code"));
        assert_eq!(
            query("redirect_uri").as_deref(),
            Some("http://localhost:3000/auth/google/callback")
        );
        assert_eq!(
            query("scope").as_deref(),
            Some(
                "https://www.googleapis.com/auth/userinfo.email \
                 https://www.googleapis.com/auth/userinfo.profile"
            )
        );
    }

    #[test]
    fn test_login_url_is_pure() {
        let provider = GoogleProvider::new(&test_config()).unwrap();
        let state = StateToken::from_value("fixed-state");
        assert_eq!(provider.login_url(&state), provider.login_url(&state));
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_exchange_and_fetch_futures_are_send() {
        let provider = GoogleProvider::new(&test_config()).unwrap();
        let token = OAuthToken {
            access_token: "tok".to_string(),
            refresh_token: None,
            token_type: "Bearer".to_string(),
            expires_at: None,
            scopes: None,
        };

        assert_send(&provider.exchange_code("code"));
        assert_send(&provider.fetch_user_info(&token));
    }

    #[test]
    fn test_missing_credentials_still_build() {
        assert!(GoogleProvider::new(&ProviderConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let config = ProviderConfig {
            token_url: Some("not a url".to_string()),
            ..test_config()
        };
        assert!(matches!(
            GoogleProvider::new(&config),
            Err(OAuthError::InvalidUrl {
                endpoint: "token",
                ..
            })
        ));
    }
}
