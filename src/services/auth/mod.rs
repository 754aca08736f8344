//! Bearer authentication against an external identity issuer.
//!
//! `header` parses `Authorization`, `verifier` checks the token (Firebase ID
//! tokens via `id_token` + `jwks`), `mapper` turns verified claims into a
//! principal, and `provider` runs the per-request state machine.

pub mod challenge;
pub mod claims;
pub mod error;
pub mod header;
pub mod id_token;
pub mod jwks;
pub mod mapper;
pub mod provider;
pub mod registry;
pub mod verifier;

pub use challenge::Challenge;
pub use claims::{DecodedClaims, FirebaseClaim};
pub use error::{AuthFailure, ProviderConfigError, VerificationFailure};
pub use header::{
    AuthHeader, Credential, HeaderExtractor, HeaderParseError, parse_authorization_header,
};
pub use id_token::IdTokenVerifier;
pub use jwks::{FIREBASE_JWKS_URL, JwksClient};
pub use mapper::PrincipalMapper;
pub use provider::{AuthOutcome, AuthenticationProvider, DEFAULT_PROVIDER_NAME, ProviderConfig};
pub use registry::Authentication;
pub use verifier::TokenVerifier;
