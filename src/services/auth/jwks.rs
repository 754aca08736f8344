//! JWKS client for the token issuer's signing keys.
//!
//! Keys are fetched from the issuer's JWKS endpoint and cached by `kid`. The
//! cache lifetime follows the response's `Cache-Control: max-age`; the issuer
//! publishes rotated keys ahead of use, so an unknown `kid` in a fresh cache is
//! a verification failure rather than a reason to refetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use reqwest::header::{CACHE_CONTROL, HeaderMap};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::services::auth::error::VerificationFailure;

/// Google's published JWKS for Firebase ID tokens.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Used when the response carries no usable `max-age`.
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

const HTTP_TIMEOUT_SECONDS: u64 = 10;

struct CachedJwks {
    keys: HashMap<String, Jwk>,
    expires_at: Instant,
}

pub struct JwksClient {
    jwks_url: String,
    http_client: reqwest::Client,
    cache: Arc<RwLock<Option<CachedJwks>>>,
    default_ttl: Duration,
}

impl std::fmt::Debug for JwksClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksClient")
            .field("jwks_url", &self.jwks_url)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl JwksClient {
    pub fn new(jwks_url: impl Into<String>) -> Self {
        Self::with_ttl(jwks_url, Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS))
    }

    /// `default_ttl` applies only when the issuer sends no `max-age`.
    pub fn with_ttl(jwks_url: impl Into<String>, default_ttl: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build JWKS HTTP client, using defaults");
                reqwest::Client::new()
            });

        Self {
            jwks_url: jwks_url.into(),
            http_client,
            cache: Arc::new(RwLock::new(None)),
            default_ttl,
        }
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    #[instrument(skip(self))]
    pub async fn get_key(&self, kid: &str) -> Result<Jwk, VerificationFailure> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.expires_at > Instant::now()
            {
                return cached.keys.get(kid).cloned().ok_or_else(|| {
                    tracing::debug!(kid = %kid, "kid not found in JWKS cache");
                    VerificationFailure::UnknownKey(kid.to_string())
                });
            }
        }

        self.refresh_cache().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| {
                tracing::warn!(kid = %kid, "kid not found in JWKS after refresh");
                VerificationFailure::UnknownKey(kid.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn refresh_cache(&self) -> Result<(), VerificationFailure> {
        tracing::debug!(url = %self.jwks_url, "fetching JWKS");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to fetch JWKS");
                VerificationFailure::IssuerUnavailable("failed to fetch signing keys".to_string())
            })?;

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), "JWKS endpoint returned error");
            return Err(VerificationFailure::IssuerUnavailable(format!(
                "signing keys endpoint returned {}",
                response.status()
            )));
        }

        let ttl = cache_ttl(response.headers()).unwrap_or(self.default_ttl);

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse JWKS response");
            VerificationFailure::IssuerUnavailable("unparseable signing keys".to_string())
        })?;

        let keys: HashMap<String, Jwk> = jwks
            .keys
            .into_iter()
            .filter_map(|key| key.common.key_id.clone().map(|kid| (kid, key)))
            .collect();

        tracing::info!(key_count = keys.len(), ttl_seconds = ttl.as_secs(), "JWKS cache refreshed");

        let mut cache = self.cache.write().await;
        *cache = Some(CachedJwks {
            keys,
            expires_at: Instant::now() + ttl,
        });

        Ok(())
    }

    #[cfg(test)]
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }
}

// `Cache-Control: public, max-age=19302, must-revalidate`
fn cache_ttl(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;
    value
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
