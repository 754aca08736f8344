/*
 * Responsibility
 * - Config load -> dependency construction -> Router assembly
 * - Tracing / panic hook setup
 * - Start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{
    self,
    extractors::{FirebaseUserPrincipal, firebase_user_principal},
};
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{
    Authentication, IdTokenVerifier, JwksClient, ProviderConfig, ProviderConfigError,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,firebase_auth=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let auth = build_authentication(&config)?;
    let app = build_router(&auth, &config)?;

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Registers the Firebase provider under `config.auth_provider_name`.
pub fn build_authentication(
    config: &Config,
) -> Result<Authentication<FirebaseUserPrincipal>, ProviderConfigError> {
    let keys = Arc::new(JwksClient::new(config.firebase_jwks_url.clone()));
    let verifier = IdTokenVerifier::new(
        keys.clone(),
        config.firebase_project_id.clone(),
        config.id_token_leeway_seconds,
    );
    tracing::info!(
        provider = %config.auth_provider_name,
        project_id = %verifier.project_id(),
        jwks_url = %keys.jwks_url(),
        "firebase id token verifier configured"
    );

    let provider = ProviderConfig::<FirebaseUserPrincipal>::new(config.auth_provider_name.clone())
        .verifier(Arc::new(verifier))
        .validate(firebase_user_principal)
        .verify_timeout(config.id_token_verify_timeout)
        .build()?;

    let mut auth = Authentication::new();
    auth.register(provider)?;
    Ok(auth)
}

pub fn build_router(
    auth: &Authentication<FirebaseUserPrincipal>,
    config: &Config,
) -> Result<Router, ProviderConfigError> {
    let router = api::routes(auth, &config.auth_provider_name)?;
    Ok(middleware::http::apply(router, config.request_timeout))
}
