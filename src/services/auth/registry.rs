use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;

use crate::middleware::auth::authenticate;
use crate::services::auth::error::ProviderConfigError;
use crate::services::auth::provider::AuthenticationProvider;

/// Named providers, built once at startup and read-only afterwards.
pub struct Authentication<P> {
    providers: HashMap<String, Arc<AuthenticationProvider<P>>>,
}

impl<P> Default for Authentication<P> {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }
}

impl<P> std::fmt::Debug for Authentication<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authentication")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<P> Authentication<P>
where
    P: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        provider: AuthenticationProvider<P>,
    ) -> Result<Arc<AuthenticationProvider<P>>, ProviderConfigError> {
        let name = provider.name().to_string();
        if self.providers.contains_key(&name) {
            return Err(ProviderConfigError::DuplicateProvider(name));
        }

        let provider = Arc::new(provider);
        self.providers.insert(name, provider.clone());
        Ok(provider)
    }

    pub fn provider(&self, name: &str) -> Option<Arc<AuthenticationProvider<P>>> {
        self.providers.get(name).cloned()
    }

    /// Gate every route of `router` behind the provider registered as `name`.
    pub fn protect<S>(&self, name: &str, router: Router<S>) -> Result<Router<S>, ProviderConfigError>
    where
        S: Clone + Send + Sync + 'static,
    {
        let provider = self
            .provider(name)
            .ok_or_else(|| ProviderConfigError::UnknownProvider(name.to_string()))?;

        Ok(authenticate::apply(router, provider))
    }
}
