//! Firebase ID token verification.
//!
//! Checks, in order:
//! 1. header `alg` is RS256 and carries a `kid`
//! 2. the `kid` resolves to a key in the issuer's JWKS
//! 3. signature, `exp`, `aud == project_id`, `iss == https://securetoken.google.com/<project_id>`
//! 4. `sub` is non-empty and at most 128 characters
//! 5. `iat` and `auth_time` are not in the future (with leeway)

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use tracing::instrument;

use crate::services::auth::claims::DecodedClaims;
use crate::services::auth::error::VerificationFailure;
use crate::services::auth::jwks::JwksClient;
use crate::services::auth::verifier::TokenVerifier;

pub const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";

const MAX_UID_LENGTH: usize = 128;

/// Tokens above this size are rejected before any parsing.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Upper bound for clock-skew leeway; larger values are clamped.
pub const MAX_LEEWAY_SECONDS: u64 = 300;

pub struct IdTokenVerifier {
    keys: Arc<JwksClient>,
    project_id: String,
    validation: Validation,
    leeway_seconds: u64,
}

impl std::fmt::Debug for IdTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdTokenVerifier")
            .field("project_id", &self.project_id)
            .field("jwks", &self.keys)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl IdTokenVerifier {
    pub fn new(keys: Arc<JwksClient>, project_id: impl Into<String>, leeway_seconds: u64) -> Self {
        let project_id = project_id.into();
        let leeway_seconds = leeway_seconds.min(MAX_LEEWAY_SECONDS);
        let issuer = format!("{}{}", FIREBASE_ISSUER_PREFIX, project_id);

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[project_id.as_str()]);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "aud", "iss"]);
        validation.leeway = leeway_seconds;

        Self {
            keys,
            project_id,
            validation,
            leeway_seconds,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn check_time_claims(&self, claims: &DecodedClaims) -> Result<(), VerificationFailure> {
        let leeway = i64::try_from(self.leeway_seconds).unwrap_or(i64::MAX);
        let latest = Utc::now().timestamp().saturating_add(leeway);

        if claims.iat > latest {
            return Err(VerificationFailure::InvalidClaim("iat".to_string()));
        }
        if claims.auth_time.is_some_and(|auth_time| auth_time > latest) {
            return Err(VerificationFailure::InvalidClaim("auth_time".to_string()));
        }
        Ok(())
    }
}

fn check_subject(claims: &DecodedClaims) -> Result<(), VerificationFailure> {
    if claims.sub.trim().is_empty() || claims.sub.chars().count() > MAX_UID_LENGTH {
        return Err(VerificationFailure::InvalidClaim("sub".to_string()));
    }
    Ok(())
}

#[async_trait]
impl TokenVerifier for IdTokenVerifier {
    #[instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<DecodedClaims, VerificationFailure> {
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            return Err(VerificationFailure::Malformed("token too large".to_string()));
        }

        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "id token header decode failed");
            VerificationFailure::Malformed("invalid token header".to_string())
        })?;

        if header.alg != Algorithm::RS256 {
            return Err(VerificationFailure::Malformed(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| VerificationFailure::Malformed("missing 'kid' header".to_string()))?;

        let jwk = self.keys.get_key(&kid).await?;
        let decoding_key = DecodingKey::from_jwk(&jwk).map_err(|e| {
            tracing::error!(kid = %kid, error = %e, "unusable issuer key");
            VerificationFailure::IssuerUnavailable("unusable signing key".to_string())
        })?;

        let data = jsonwebtoken::decode::<DecodedClaims>(token, &decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "id token verification failed");
                VerificationFailure::from(e)
            })?;
        let claims = data.claims;

        check_subject(&claims)?;
        self.check_time_claims(&claims)?;

        Ok(claims)
    }
}
