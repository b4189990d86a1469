//! Session types and data structures
//!
//! The session is a fixed, typed record. It travels inside the encrypted session
//! cookie as JSON; there is no server-side store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::oauth2::UserInfo;

/// Claims kept in the session cookie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Email address reported by the provider
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar/profile picture URL
    pub picture: String,
    /// Whether this session represents a completed login
    pub authenticated: bool,
    /// Login time in seconds since the Unix epoch
    pub login_time: i64,
}

impl SessionRecord {
    /// Build an authenticated record from the provider's profile claims
    #[must_use]
    pub fn from_user(user: &UserInfo, login_time: i64) -> Self {
        Self {
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
            authenticated: true,
            login_time,
        }
    }

    /// Login time as a UTC timestamp
    #[must_use]
    pub fn login_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.login_time, 0)
    }

    /// Check whether more than `max_age_secs` have passed since login
    #[must_use]
    pub const fn is_expired_at(&self, now: i64, max_age_secs: i64) -> bool {
        now.saturating_sub(self.login_time) > max_age_secs
    }
}

/// Why a session cookie could not be used
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request carries no session cookie
    #[error("No session cookie")]
    Missing,

    /// The cookie does not decrypt under the current key
    #[error("Session cookie failed authentication (tampered or signed with another key)")]
    Invalid,

    /// The decrypted value is not a session record
    #[error("Session cookie could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    /// The session outlived its maximum age
    #[error("Session expired")]
    Expired,

    /// The record could not be serialized
    #[error("Session could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_user_copies_claims() {
        let user = UserInfo {
            email: "a@example.com".to_string(),
            verified_email: true,
            name: "A".to_string(),
            picture: "http://x/p.png".to_string(),
        };

        let record = SessionRecord::from_user(&user, 1_700_000_000);
        assert_eq!(record.email, "a@example.com");
        assert_eq!(record.name, "A");
        assert_eq!(record.picture, "http://x/p.png");
        assert!(record.authenticated);
        assert_eq!(record.login_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_expiry_boundary() {
        let record = SessionRecord {
            login_time: 1_000,
            ..SessionRecord::default()
        };
        assert!(!record.is_expired_at(1_100, 100));
        assert!(record.is_expired_at(1_101, 100));
    }

    #[test]
    fn test_missing_authenticated_claim_fails_to_decode() {
        let result: Result<SessionRecord, _> = serde_json::from_str(
            r#"{"email":"a@example.com","name":"A","picture":"","login_time":1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_for_authenticated_fails_to_decode() {
        let result: Result<SessionRecord, _> = serde_json::from_str(
            r#"{"email":"","name":"","picture":"","authenticated":"yes","login_time":1}"#,
        );
        assert!(result.is_err());
    }
}
