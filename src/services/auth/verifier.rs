use async_trait::async_trait;

use crate::services::auth::claims::DecodedClaims;
use crate::services::auth::error::VerificationFailure;

/// Adapter to the identity-token issuer.
///
/// `verify` may suspend on network I/O. It runs on the tokio runtime as an
/// ordinary future, so a stalled verification only holds its own request.
/// Implementations that must call blocking code should move it onto
/// `tokio::task::spawn_blocking`.
///
/// Implementations collapse every issuer-side failure (network, malformed,
/// expired, bad signature) into a `VerificationFailure`. They must not retry.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<DecodedClaims, VerificationFailure>;
}
