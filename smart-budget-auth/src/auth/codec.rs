//! Cookie encoding for sessions
//!
//! [`SessionCodec`] reads and writes the [`SessionRecord`] in an encrypted,
//! authenticated private cookie. Reads never fail the request: at the
//! [`SessionCodec::is_authenticated`] boundary every [`SessionError`] collapses to
//! "not authenticated" and is logged.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, Key, PrivateCookieJar};
use chrono::Utc;

use crate::auth::session::{SessionError, SessionRecord};
use crate::config::SessionSettings;
use crate::oauth2::UserInfo;

/// Max-Age written on logout so that the browser drops the cookie
pub const EXPIRE_NOW_SECS: i64 = -1;

/// Encrypted cookie codec for [`SessionRecord`]s
#[derive(Clone)]
pub struct SessionCodec {
    key: Key,
    settings: SessionSettings,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("key", &"Key")
            .field("settings", &self.settings)
            .finish()
    }
}

impl SessionCodec {
    /// Create a codec from an encryption key and cookie settings
    #[must_use]
    pub const fn new(key: Key, settings: SessionSettings) -> Self {
        Self { key, settings }
    }

    /// Cookie settings in use
    #[must_use]
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Private jar over the request's cookies
    ///
    /// Returned jars only emit the cookies added to them, so they can be handed
    /// straight back as a response part.
    #[must_use]
    pub fn jar(&self, headers: &HeaderMap) -> PrivateCookieJar {
        PrivateCookieJar::from_headers(headers, self.key.clone())
    }

    /// Record a successful login
    ///
    /// Copies the profile claims into a fresh authenticated record stamped with
    /// the current time and writes it with the configured max-age.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Encode`] if the record cannot be serialized.
    pub fn save(
        &self,
        headers: &HeaderMap,
        user: &UserInfo,
    ) -> Result<PrivateCookieJar, SessionError> {
        let record = SessionRecord::from_user(user, Utc::now().timestamp());
        self.save_record(headers, &record)
    }

    /// Write an arbitrary record with the configured max-age
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Encode`] if the record cannot be serialized.
    pub fn save_record(
        &self,
        headers: &HeaderMap,
        record: &SessionRecord,
    ) -> Result<PrivateCookieJar, SessionError> {
        let cookie = self.cookie(record, self.settings.max_age_secs)?;
        Ok(self.jar(headers).add(cookie))
    }

    /// Decode the session carried by the request
    ///
    /// # Errors
    ///
    /// - [`SessionError::Missing`] when there is no session cookie
    /// - [`SessionError::Invalid`] when it does not decrypt under the current key
    /// - [`SessionError::Decode`] when the plaintext is not a [`SessionRecord`]
    /// - [`SessionError::Expired`] when the login is older than the max-age
    pub fn load(&self, headers: &HeaderMap) -> Result<SessionRecord, SessionError> {
        let name = self.settings.cookie_name.as_str();

        if CookieJar::from_headers(headers).get(name).is_none() {
            return Err(SessionError::Missing);
        }

        let cookie = self.jar(headers).get(name).ok_or(SessionError::Invalid)?;
        let value = cookie.value();
        let record: SessionRecord = serde_json::from_str(value).map_err(SessionError::Decode)?;

        if record.is_expired_at(Utc::now().timestamp(), self.settings.max_age_secs) {
            return Err(SessionError::Expired);
        }

        Ok(record)
    }

    /// Check whether the request carries an authenticated session
    ///
    /// Any load failure is logged and treated as "not authenticated".
    #[must_use]
    pub fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        match self.load(headers) {
            Ok(record) => record.authenticated,
            Err(SessionError::Missing) => false,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session cookie");
                false
            }
        }
    }

    /// Log the session out
    ///
    /// Keeps whatever claims could be decoded, marks the record unauthenticated,
    /// and writes it back with a negative max-age so the browser deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Encode`] if the record cannot be serialized.
    pub fn clear(&self, headers: &HeaderMap) -> Result<PrivateCookieJar, SessionError> {
        let mut record = self.load(headers).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Clearing session that could not be loaded");
            SessionRecord::default()
        });
        record.authenticated = false;

        let cookie = self.cookie(&record, EXPIRE_NOW_SECS)?;
        Ok(self.jar(headers).add(cookie))
    }

    fn cookie(
        &self,
        record: &SessionRecord,
        max_age_secs: i64,
    ) -> Result<Cookie<'static>, SessionError> {
        let value = serde_json::to_string(record).map_err(SessionError::Encode)?;

        Ok(Cookie::build((self.settings.cookie_name.clone(), value))
            .path(self.settings.cookie_path.clone())
            .max_age(time::Duration::seconds(max_age_secs))
            .http_only(self.settings.http_only)
            .secure(self.settings.secure)
            .same_site(self.settings.same_site.into())
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{
        header::{COOKIE, SET_COOKIE},
        HeaderValue,
    };
    use axum::response::IntoResponse;

    fn codec() -> SessionCodec {
        SessionCodec::new(Key::generate(), SessionSettings::default())
    }

    fn user() -> UserInfo {
        UserInfo {
            email: "a@example.com".to_string(),
            verified_email: true,
            name: "A".to_string(),
            picture: "http://x/p.png".to_string(),
        }
    }

    /// Raw Set-Cookie line emitted by a jar
    fn set_cookie(jar: PrivateCookieJar) -> String {
        let response = jar.into_response();
        response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    /// Request headers presenting the cookie from a Set-Cookie line
    fn presenting(set_cookie: &str) -> HeaderMap {
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, pair.parse().unwrap());
        headers
    }

    #[test]
    fn test_fresh_request_is_not_authenticated() {
        let codec = codec();
        let headers = HeaderMap::new();
        assert!(!codec.is_authenticated(&headers));
        assert!(matches!(codec.load(&headers), Err(SessionError::Missing)));
    }

    #[test]
    fn test_save_then_load() {
        let codec = codec();
        let line = set_cookie(codec.save(&HeaderMap::new(), &user()).unwrap());
        let headers = presenting(&line);

        let record = codec.load(&headers).unwrap();
        assert_eq!(record.email, "a@example.com");
        assert_eq!(record.name, "A");
        assert_eq!(record.picture, "http://x/p.png");
        assert!(record.authenticated);
        assert!(codec.is_authenticated(&headers));
    }

    #[test]
    fn test_saved_cookie_attributes() {
        let codec = codec();
        let line = set_cookie(codec.save(&HeaderMap::new(), &user()).unwrap());

        assert!(line.starts_with("smart-budget-session="));
        assert!(line.contains("Max-Age=604800"));
        assert!(line.contains("Path=/"));
        assert!(line.contains("HttpOnly"));
        assert!(line.contains("SameSite=Lax"));
        assert!(!line.contains("Secure"));
        assert!(!line.contains("a@example.com"));
    }

    #[test]
    fn test_secure_flag_is_configurable() {
        let codec = SessionCodec::new(
            Key::generate(),
            SessionSettings {
                secure: true,
                ..SessionSettings::default()
            },
        );
        let line = set_cookie(codec.save(&HeaderMap::new(), &user()).unwrap());
        assert!(line.contains("Secure"));
    }

    #[test]
    fn test_clear_expires_cookie_and_deauthenticates() {
        let codec = codec();
        let jar = codec.save(&HeaderMap::new(), &user()).unwrap();
        let saved = presenting(&set_cookie(jar));
        assert!(codec.is_authenticated(&saved));

        let cleared_line = set_cookie(codec.clear(&saved).unwrap());
        assert!(cleared_line.contains("Max-Age=-1"));

        let cleared = presenting(&cleared_line);
        assert!(!codec.is_authenticated(&cleared));
        let record = codec.load(&cleared).unwrap();
        assert!(!record.authenticated);
        assert_eq!(record.email, "a@example.com");
    }

    #[test]
    fn test_clear_without_session() {
        let codec = codec();
        let line = set_cookie(codec.clear(&HeaderMap::new()).unwrap());
        assert!(line.contains("Max-Age=-1"));
        assert!(!codec.is_authenticated(&presenting(&line)));
    }

    #[test]
    fn test_cookie_from_other_key_is_rejected() {
        let issuer = codec();
        let verifier = codec();
        let jar = issuer.save(&HeaderMap::new(), &user()).unwrap();
        let headers = presenting(&set_cookie(jar));

        assert!(matches!(
            verifier.load(&headers),
            Err(SessionError::Invalid)
        ));
        assert!(!verifier.is_authenticated(&headers));
    }

    #[test]
    fn test_tampered_cookie_is_rejected() {
        let codec = codec();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("smart-budget-session=eyJhdXRoZW50aWNhdGVkIjp0cnVlfQ"),
        );

        assert!(matches!(codec.load(&headers), Err(SessionError::Invalid)));
        assert!(!codec.is_authenticated(&headers));
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let codec = codec();
        let record = SessionRecord {
            login_time: Utc::now().timestamp() - codec.settings().max_age_secs - 60,
            ..SessionRecord::from_user(&user(), 0)
        };
        let jar = codec.save_record(&HeaderMap::new(), &record).unwrap();
        let headers = presenting(&set_cookie(jar));

        assert!(matches!(codec.load(&headers), Err(SessionError::Expired)));
        assert!(!codec.is_authenticated(&headers));
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", codec());
        assert!(rendered.contains("SessionCodec"));
        assert!(rendered.contains("\"Key\""));
    }
}
