use serde::Serialize;

use crate::services::auth::DecodedClaims;

/// Caller identity for the demo routes.
///
/// Fields are private; the only ways in are `new` and
/// `firebase_user_principal`, both of which reject blank values.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct FirebaseUserPrincipal {
    subject_id: String,
    email_address: String,
}

impl FirebaseUserPrincipal {
    pub fn new(subject_id: impl Into<String>, email_address: impl Into<String>) -> Option<Self> {
        let subject_id = subject_id.into();
        let email_address = email_address.into();
        if subject_id.is_empty() || email_address.is_empty() {
            return None;
        }
        Some(Self {
            subject_id,
            email_address,
        })
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }
}

impl std::fmt::Debug for FirebaseUserPrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseUserPrincipal")
            .field("subject_id", &"[REDACTED]")
            .field("email_address", &"[REDACTED]")
            .finish()
    }
}

/// Mapper used by the demo provider: uid and email are both required.
pub fn firebase_user_principal(claims: &DecodedClaims) -> Option<FirebaseUserPrincipal> {
    FirebaseUserPrincipal::new(claims.uid(), claims.email()?)
}
