//! Bearer authentication provider.
//!
//! One attempt per request:
//!
//! ```text
//! Extracting --absent/malformed/other scheme--> Challenged
//!     |
//! Verifying  --verifier failure-------------> Errored
//!     |
//! Mapping    --mapper returned None---------> Challenged (PolicyRejection)
//!     |
//! Authenticated(principal)
//! ```
//!
//! The provider holds no per-request state; configuration is immutable after
//! `build()` and shared read-only by every request.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue};
use tracing::instrument;

use crate::services::auth::challenge::{Challenge, bearer_challenge_header};
use crate::services::auth::claims::DecodedClaims;
use crate::services::auth::error::{AuthFailure, ProviderConfigError, VerificationFailure};
use crate::services::auth::header::{HeaderExtractor, default_header_extractor};
use crate::services::auth::mapper::PrincipalMapper;
use crate::services::auth::verifier::TokenVerifier;

/// Default provider name, also the default challenge realm.
pub const DEFAULT_PROVIDER_NAME: &str = "firebaseAuth";

/// Terminal state of one authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome<P> {
    Authenticated(P),
    /// Respond with a Bearer challenge and stop the pipeline.
    Challenged(Challenge),
    /// The verifier failed; the host reports the cause and issues its challenge.
    Errored(AuthFailure),
}

impl<P> AuthOutcome<P> {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn failure(&self) -> Option<&AuthFailure> {
        match self {
            Self::Authenticated(_) => None,
            Self::Challenged(challenge) => Some(&challenge.cause),
            Self::Errored(failure) => Some(failure),
        }
    }
}

pub struct ProviderConfig<P> {
    name: String,
    realm: Option<String>,
    header_extractor: HeaderExtractor,
    verifier: Option<Arc<dyn TokenVerifier>>,
    mapper: Option<Arc<dyn PrincipalMapper<P>>>,
    verify_timeout: Option<Duration>,
}

impl<P> ProviderConfig<P> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            realm: None,
            header_extractor: default_header_extractor(),
            verifier: None,
            mapper: None,
            verify_timeout: None,
        }
    }

    /// Challenge realm; defaults to the provider name.
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    pub fn header_extractor(mut self, extractor: HeaderExtractor) -> Self {
        self.header_extractor = extractor;
        self
    }

    pub fn verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Principal mapper. Required.
    pub fn validate<M>(mut self, mapper: M) -> Self
    where
        M: PrincipalMapper<P> + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    pub fn verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<AuthenticationProvider<P>, ProviderConfigError> {
        if self.name.trim().is_empty() {
            return Err(ProviderConfigError::EmptyName);
        }
        let mapper = self
            .mapper
            .ok_or_else(|| ProviderConfigError::MissingMapper(self.name.clone()))?;
        let verifier = self
            .verifier
            .ok_or_else(|| ProviderConfigError::MissingVerifier(self.name.clone()))?;

        let realm = self.realm.unwrap_or_else(|| self.name.clone());
        let challenge_header =
            bearer_challenge_header(&realm).ok_or_else(|| ProviderConfigError::InvalidRealm {
                name: self.name.clone(),
            })?;

        Ok(AuthenticationProvider {
            name: self.name,
            realm,
            challenge_header,
            header_extractor: self.header_extractor,
            verifier,
            mapper,
            verify_timeout: self.verify_timeout,
        })
    }
}

pub struct AuthenticationProvider<P> {
    name: String,
    realm: String,
    challenge_header: HeaderValue,
    header_extractor: HeaderExtractor,
    verifier: Arc<dyn TokenVerifier>,
    mapper: Arc<dyn PrincipalMapper<P>>,
    verify_timeout: Option<Duration>,
}

impl<P> std::fmt::Debug for AuthenticationProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationProvider")
            .field("name", &self.name)
            .field("realm", &self.realm)
            .field("verify_timeout", &self.verify_timeout)
            .finish_non_exhaustive()
    }
}

impl<P> AuthenticationProvider<P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Pre-rendered `WWW-Authenticate` value for this provider.
    pub fn challenge_header(&self) -> &HeaderValue {
        &self.challenge_header
    }

    #[instrument(skip_all, fields(provider = %self.name))]
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome<P> {
        let header = match (self.header_extractor)(headers) {
            Ok(Some(header)) => header,
            Ok(None) => return self.challenged(AuthFailure::MissingCredential),
            Err(e) => {
                tracing::debug!(error = %e, "failed to parse authorization header");
                return self.challenged(AuthFailure::MissingCredential);
            }
        };

        let Some(token) = header.bearer_blob() else {
            return self.challenged(AuthFailure::UnsupportedScheme(header.scheme().to_string()));
        };

        let claims = match self.verify(token).await {
            Ok(claims) => claims,
            Err(failure) => {
                tracing::warn!(
                    kind = failure.kind(),
                    cause = %failure,
                    "token verification failed"
                );
                return AuthOutcome::Errored(AuthFailure::Verification(failure));
            }
        };

        match self.mapper.map_claims(&claims) {
            Some(principal) => AuthOutcome::Authenticated(principal),
            None => {
                tracing::info!("verified claims rejected by principal mapper");
                self.challenged(AuthFailure::PolicyRejection)
            }
        }
    }

    async fn verify(&self, token: &str) -> Result<DecodedClaims, VerificationFailure> {
        match self.verify_timeout {
            Some(limit) => tokio::time::timeout(limit, self.verifier.verify(token))
                .await
                .unwrap_or_else(|_| Err(VerificationFailure::Timeout)),
            None => self.verifier.verify(token).await,
        }
    }

    fn challenged(&self, cause: AuthFailure) -> AuthOutcome<P> {
        tracing::debug!(cause = cause.kind(), "authentication challenged");
        AuthOutcome::Challenged(Challenge::bearer(self.realm.clone(), cause))
    }
}
