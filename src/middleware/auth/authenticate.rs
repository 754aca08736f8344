//! Bearer authentication gate for protected routes.
//!
//! Runs the provider once per request:
//! - `Authenticated`: the principal goes into request extensions and the
//!   wrapped handler runs.
//! - `Challenged` / `Errored`: `401` with `WWW-Authenticate: Bearer realm="..."`.
//!   The failure is logged and attached to the response extensions; the client
//!   never sees the cause.
//!
//! Dropping the request future (timeout, client disconnect) drops any in-flight
//! verification with it.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::auth::{AuthFailure, AuthOutcome, AuthenticationProvider};

/// Wrap the routes of `router` with `provider`.
///
/// Uses `route_layer`, so unmatched paths still 404 instead of 401.
pub fn apply<S, P>(router: Router<S>, provider: Arc<AuthenticationProvider<P>>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(
        provider,
        require_principal::<P>,
    ))
}

async fn require_principal<P>(
    State(provider): State<Arc<AuthenticationProvider<P>>>,
    mut req: Request,
    next: Next,
) -> Response
where
    P: Clone + Send + Sync + 'static,
{
    let failure = match provider.authenticate(req.headers()).await {
        AuthOutcome::Authenticated(principal) => {
            // middleware -> extractor
            req.extensions_mut().insert(principal);
            return next.run(req).await;
        }
        AuthOutcome::Challenged(challenge) => {
            tracing::debug!(
                provider = %provider.name(),
                cause = challenge.cause.kind(),
                challenge = %challenge.render(),
                "authentication challenged"
            );
            challenge.cause
        }
        AuthOutcome::Errored(failure) => {
            tracing::debug!(
                provider = %provider.name(),
                cause = failure.kind(),
                "authentication errored"
            );
            failure
        }
    };

    unauthorized(&provider, failure)
}

fn unauthorized<P>(provider: &AuthenticationProvider<P>, failure: AuthFailure) -> Response {
    let mut response = AppError::Unauthorized {
        challenge: provider.challenge_header().clone(),
    }
    .into_response();
    response.extensions_mut().insert(failure);
    response
}
