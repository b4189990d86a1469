//! Anti-forgery state tokens for the authorization round trip
//!
//! A [`StateToken`] is generated for every login attempt and sent along with the
//! authorization request. The provider echoes it back on the callback, where the
//! hosting application compares it with the copy it kept. Nothing here stores or
//! expires tokens.

use base64::{engine::general_purpose::URL_SAFE, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of random bytes in a state token (256 bits)
pub const STATE_TOKEN_BYTES: usize = 32;

/// OAuth2 CSRF state token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateToken(String);

impl StateToken {
    /// Generate a new random state token
    ///
    /// 256 bits from the OS random source, base64 URL-safe encoded.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; STATE_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE.encode(bytes))
    }

    /// Wrap a token value received from elsewhere (a cookie, the callback query)
    #[must_use]
    pub fn from_value(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Token value as sent to the provider
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the `state` parameter returned on the callback
    #[must_use]
    pub fn matches(&self, returned: &str) -> bool {
        !self.0.is_empty() && self.0 == returned
    }
}

impl fmt::Display for StateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_token_is_url_safe_256_bits() {
        let token = StateToken::generate();
        let decoded = URL_SAFE.decode(token.as_str()).unwrap();
        assert_eq!(decoded.len(), STATE_TOKEN_BYTES);
        assert!(!token.as_str().contains('+'));
        assert!(!token.as_str().contains('/'));
    }

    #[test]
    fn test_state_tokens_are_independent() {
        assert_ne!(StateToken::generate(), StateToken::generate());
    }

    #[test]
    fn test_matches() {
        let token = StateToken::generate();
        assert!(token.matches(token.as_str()));
        assert!(!token.matches("forged"));
        assert!(!StateToken::from_value("").matches(""));
    }
}
