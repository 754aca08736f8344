/*
 * Responsibility
 * - URL structure of the demo host
 * - Public routes are merged as-is; the protected ones are wrapped with the
 *   named provider through Authentication::protect (route_layer)
 */
use axum::{Router, routing::get};

use crate::api::extractors::FirebaseUserPrincipal;
use crate::api::handlers::{health::health, hello::hello, protected::basic};
use crate::services::auth::{Authentication, ProviderConfigError};

pub fn routes(
    auth: &Authentication<FirebaseUserPrincipal>,
    provider_name: &str,
) -> Result<Router, ProviderConfigError> {
    let public = Router::new()
        .route("/", get(hello))
        .route("/health", get(health));

    let protected = auth.protect(
        provider_name,
        Router::new().route("/protected/route/basic", get(basic)),
    )?;

    Ok(public.merge(protected))
}
