use axum::http::HeaderValue;

use crate::services::auth::error::AuthFailure;
use crate::services::auth::header::{BEARER_SCHEME, quote};

/// A 401 challenge to emit for a failed authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub scheme: &'static str,
    pub realm: String,
    pub cause: AuthFailure,
}

impl Challenge {
    pub fn bearer(realm: impl Into<String>, cause: AuthFailure) -> Self {
        Self {
            scheme: BEARER_SCHEME,
            realm: realm.into(),
            cause,
        }
    }

    /// `Bearer realm="<realm>"`
    pub fn render(&self) -> String {
        render_challenge(self.scheme, &self.realm)
    }
}

pub fn render_challenge(scheme: &str, realm: &str) -> String {
    format!("{} realm={}", scheme, quote(realm))
}

/// Pre-render the provider's challenge; fails for realms that are not valid header text.
pub fn bearer_challenge_header(realm: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&render_challenge(BEARER_SCHEME, realm)).ok()
}
