//! Request authentication for the speedrun.com API.
//!
//! The service authenticates with a static per-user key sent in the
//! `X-API-Key` header. Every request also carries a `User-Agent`. Both are
//! fixed when the [`crate::Transport`] is built and cannot be overridden per call.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
/// Secret string types that redact values in debug output for security.
pub use secrecy::{ExposeSecret, SecretString};

use crate::Result;

/// Header carrying the API key.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// An API key issued by speedrun.com (found under the user's settings page).
///
/// The key is held as a [`SecretString`] so it never shows up in `Debug` output.
#[derive(Clone, Debug)]
pub struct ApiKey(SecretString);

impl ApiKey {
    #[must_use]
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Returns the wrapped secret.
    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.0
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Builds the immutable header set attached to every request.
pub(crate) fn default_headers(user_agent: &str, api_key: Option<&ApiKey>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(key) = api_key {
        let mut value = HeaderValue::from_str(key.secret().expose_secret())?;
        value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, value);
    }

    Ok(headers)
}
