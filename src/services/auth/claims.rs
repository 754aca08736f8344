//! Decoded ID token claims.
//!
//! Produced once per successful verification and handed to the principal
//! mapper. `sub` and `email` are redacted in Debug output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Firebase-specific `firebase` claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseClaim {
    #[serde(default)]
    pub sign_in_provider: Option<String>,
    #[serde(default)]
    pub tenant: Option<String>,
}

/// Issuer-verified token payload.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedClaims {
    /// Subject; the Firebase uid.
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase: Option<FirebaseClaim>,

    /// Custom claims set by the application.
    #[serde(flatten)]
    pub custom: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Debug for DecodedClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedClaims")
            .field("sub", &"[REDACTED]")
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .field("auth_time", &self.auth_time)
            .field("email", &self.email.as_ref().map(|_| "[REDACTED]"))
            .field("email_verified", &self.email_verified)
            .field("firebase", &self.firebase)
            .finish_non_exhaustive()
    }
}

impl DecodedClaims {
    pub fn uid(&self) -> &str {
        &self.sub
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.custom.get(name)
    }

    pub fn sign_in_provider(&self) -> Option<&str> {
        self.firebase
            .as_ref()
            .and_then(|f| f.sign_in_provider.as_deref())
    }
}
