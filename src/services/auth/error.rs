//! Authentication error taxonomy.
//!
//! Per-request conditions (`AuthFailure`, `VerificationFailure`) never escape the
//! provider as faults; they become an outcome. `ProviderConfigError` is the only
//! error allowed to abort startup.

use thiserror::Error;

/// Issuer-side verification failure. Every variant renders a non-empty cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    #[error("token expired")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("invalid '{0}' claim")]
    InvalidClaim(String),
    #[error("no signing key for kid '{0}'")]
    UnknownKey(String),
    #[error("token issuer unavailable: {0}")]
    IssuerUnavailable(String),
    #[error("token verification timed out")]
    Timeout,
    #[error("{0}")]
    Rejected(String),
}

impl VerificationFailure {
    pub fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Rejected("token rejected".to_string())
        } else {
            Self::Rejected(message)
        }
    }

    /// Stable failure-kind name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::InvalidSignature => "invalid_signature",
            Self::Malformed(_) => "malformed",
            Self::InvalidClaim(_) => "invalid_claim",
            Self::UnknownKey(_) => "unknown_key",
            Self::IssuerUnavailable(_) => "issuer_unavailable",
            Self::Timeout => "timeout",
            Self::Rejected(_) => "rejected",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerificationFailure {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidIssuer => Self::InvalidClaim("iss".to_string()),
            ErrorKind::InvalidAudience => Self::InvalidClaim("aud".to_string()),
            ErrorKind::InvalidSubject => Self::InvalidClaim("sub".to_string()),
            ErrorKind::ImmatureSignature => Self::InvalidClaim("nbf".to_string()),
            ErrorKind::MissingRequiredClaim(claim) => Self::InvalidClaim(claim.clone()),
            ErrorKind::InvalidAlgorithm => Self::Malformed("unsupported algorithm".to_string()),
            _ => Self::Malformed(e.to_string()),
        }
    }
}

/// Why an authentication attempt did not produce a principal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// No `Authorization` header, or one that does not parse.
    #[error("missing credential")]
    MissingCredential,
    /// Header present with a scheme other than `Bearer <token>`.
    #[error("unsupported auth scheme '{0}'")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Verification(#[from] VerificationFailure),
    /// Claims verified but the principal mapper declined them.
    #[error("claims rejected by principal policy")]
    PolicyRejection,
}

impl AuthFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::UnsupportedScheme(_) => "unsupported_scheme",
            Self::Verification(_) => "verification_failure",
            Self::PolicyRejection => "policy_rejection",
        }
    }
}

/// Startup-time provider misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderConfigError {
    #[error("provider name must not be empty")]
    EmptyName,
    #[error("provider '{0}' has no principal mapper; call validate(..) when configuring it")]
    MissingMapper(String),
    #[error("provider '{0}' has no token verifier")]
    MissingVerifier(String),
    #[error("provider '{name}' realm cannot be used in a WWW-Authenticate header")]
    InvalidRealm { name: String },
    #[error("provider '{0}' is already registered")]
    DuplicateProvider(String),
    #[error("no provider registered under '{0}'")]
    UnknownProvider(String),
}
