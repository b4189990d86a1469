//! OAuth2 authentication module
//!
//! Google sign-in through the authorization-code flow:
//!
//! 1. [`StateToken::generate`] creates the anti-forgery value for one attempt
//! 2. [`GoogleProvider::login_url`] builds the consent URL (offline access)
//! 3. [`GoogleProvider::exchange_code`] trades the callback `code` for a token
//! 4. [`GoogleProvider::fetch_user_info`] reads the profile claims
//!
//! The hosting application keeps the state token between steps 1 and 3 and
//! compares it with the `state` query parameter on the callback. Nothing in this
//! module persists it.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use smart_budget_auth::oauth2::{GoogleProvider, ProviderConfig, StateToken};
//!
//! # async fn example() -> Result<(), smart_budget_auth::oauth2::OAuthError> {
//! let provider = GoogleProvider::new(&ProviderConfig {
//!     client_id: "client-id".to_string(),
//!     client_secret: "client-secret".to_string(),
//!     redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
//!     ..ProviderConfig::default()
//! })?;
//!
//! let state = StateToken::generate();
//! let url = provider.login_url(&state);
//!
//! // ...browser comes back with ?code=...&state=...
//! let token = provider.exchange_code("code-from-callback").await?;
//! let user = provider.fetch_user_info(&token).await?;
//! println!("{url} -> {}", user.email);
//! # Ok(())
//! # }
//! ```

pub mod http;
pub mod providers;
pub mod state;
pub mod types;

pub use providers::GoogleProvider;
pub use state::StateToken;
pub use types::{OAuthError, OAuthToken, ProviderConfig, UserInfo};
