use crate::services::auth::claims::DecodedClaims;

/// Application policy turning verified claims into a principal.
///
/// `None` means the claims verified but do not satisfy the policy. Mappers are
/// pure: no retries, no request mutation.
pub trait PrincipalMapper<P>: Send + Sync {
    fn map_claims(&self, claims: &DecodedClaims) -> Option<P>;
}

impl<P, F> PrincipalMapper<P> for F
where
    F: Fn(&DecodedClaims) -> Option<P> + Send + Sync,
{
    fn map_claims(&self, claims: &DecodedClaims) -> Option<P> {
        self(claims)
    }
}
