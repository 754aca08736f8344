use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

/// Principal placed in request extensions by the auth gate.
///
/// Missing principal means the route was never wrapped by a provider; that is
/// answered with a bare 401 rather than trusting the request.
pub struct Authenticated<P>(pub P);

impl<S, P> FromRequestParts<S> for Authenticated<P>
where
    S: Send + Sync,
    P: Clone + Send + Sync + 'static,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<P>()
            .cloned()
            .map(Authenticated)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
