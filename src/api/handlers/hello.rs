use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn hello() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"message": "Hello World!"})))
}
