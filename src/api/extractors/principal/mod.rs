/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - Hand the principal produced by the auth gate to handlers
 * - axum-dependent code lives in core; the principal type and its mapper in types
 *
 * Public API:
 * - Authenticated
 * - FirebaseUserPrincipal
 * - firebase_user_principal
 */

mod core;
mod types;

pub use core::Authenticated;
pub use types::{FirebaseUserPrincipal, firebase_user_principal};
