/*
 * Responsibility
 * - GET /protected/route/basic
 * - Only reachable once the auth gate has put a principal in the request
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::api::extractors::{Authenticated, FirebaseUserPrincipal};

pub async fn basic(
    Authenticated(principal): Authenticated<FirebaseUserPrincipal>,
) -> impl IntoResponse {
    let message = format!(
        "Hello {} with email {}",
        principal.subject_id(),
        principal.email_address()
    );
    (StatusCode::OK, Json(json!({ "message": message })))
}
