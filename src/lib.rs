//! Bearer-token authentication provider for axum, backed by Firebase ID tokens.
//!
//! The reusable pieces live in [`services::auth`] and
//! [`middleware::auth::authenticate`]; [`app`] wires them into a small demo host.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
