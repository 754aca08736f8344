/*
 * Responsibility
 * - HTTP-facing AppError
 * - IntoResponse (status / WWW-Authenticate / JSON error body)
 * - The body never carries internal causes; those stay in server-side logs
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed; `challenge` is the rendered `WWW-Authenticate` value.
    #[error("unauthorized")]
    Unauthorized { challenge: HeaderValue },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            AppError::Unauthorized { challenge } => {
                let body = ErrorResponse {
                    error: ErrorBody {
                        code: "UNAUTHORIZED",
                        message,
                    },
                };
                (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, challenge)],
                    Json(body),
                )
                    .into_response()
            }
        }
    }
}
