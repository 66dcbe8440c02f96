use std::collections::BTreeMap;
use tracing::{debug, error, warn};

use crate::{
    errors::ResolveErrorKind,
    finalizer::BoxedFinalizer,
    instantiator::Instantiator,
    provider::Provider,
    scope::Scope,
    token::{Token, TokenInfo, TokenKey},
};

#[derive(Clone)]
pub(crate) struct ProviderData {
    pub(crate) token: TokenInfo,
    pub(crate) instantiator: Instantiator,
    pub(crate) scope: Scope,
    pub(crate) finalizer: Option<BoxedFinalizer>,
}

/// Set of providers keyed by their tokens.
///
/// Registering a provider for an already registered token replaces the previous one.
#[derive(Default, Clone)]
pub struct Registry {
    providers: BTreeMap<TokenKey, ProviderData>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn provide<T: Send + Sync + 'static>(mut self, provider: Provider<T>) -> Self {
        self.add(provider);
        self
    }

    /// Adds the provider, returns `true` if it replaced a provider of the same token
    pub fn add<T: Send + Sync + 'static>(&mut self, provider: Provider<T>) -> bool {
        let data = provider.into_data();
        let TokenInfo { key, name } = data.token;

        if data.finalizer.is_some() && !data.scope.is_cached() {
            warn!(token = name, "Finalizer of a transient provider is never called");
        }

        let scope = data.scope.name();
        let replaced = self.providers.insert(key, data).is_some();
        if replaced {
            debug!(token = name, scope, "Provider replaced");
        } else {
            debug!(token = name, scope, "Provider added");
        }
        replaced
    }

    #[inline]
    #[must_use]
    pub fn contains<T>(&self, token: Token<T>) -> bool {
        self.providers.contains_key(&token.info().key)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider of the token, a missing provider is an error unless the lookup is optional
    pub(crate) fn lookup(&self, token: TokenInfo, optional: bool) -> Result<Option<&ProviderData>, ResolveErrorKind> {
        match self.providers.get(&token.key) {
            Some(data) => Ok(Some(data)),
            None if optional => Ok(None),
            None => {
                let err = ResolveErrorKind::NoProvider { token: token.name };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;
    use crate::{errors::ResolveErrorKind, provider::Provider, token::Token};

    use tracing_test::traced_test;

    #[derive(Clone)]
    struct Config(u8);

    #[test]
    #[traced_test]
    fn test_provide() {
        let config = Token::<Config>::new("CONFIG");
        let other = Token::<Config>::new("CONFIG");

        let mut registry = Registry::new().provide(Provider::value(config, Config(1)));
        assert!(registry.contains(config));
        assert!(!registry.contains(other));
        assert_eq!(registry.len(), 1);

        assert!(registry.add(Provider::value(config, Config(2))));
        assert!(!registry.add(Provider::value(other, Config(3))));
        assert_eq!(registry.len(), 2);
        assert!(logs_contain("Provider replaced"));
        assert!(logs_contain("Provider added"));
        assert!(logs_contain("singleton"));
    }

    #[test]
    #[traced_test]
    fn test_lookup() {
        let config = Token::<Config>::new("CONFIG");
        let registry = Registry::default();

        assert!(registry.is_empty());
        assert!(registry.lookup(config.info(), true).unwrap().is_none());
        assert!(matches!(
            registry.lookup(config.info(), false),
            Err(ResolveErrorKind::NoProvider { token: "CONFIG" })
        ));
    }

    #[test]
    #[traced_test]
    fn test_transient_finalizer_warning() {
        let registry = Registry::new().provide(
            Provider::value(Token::<Config>::new("CONFIG"), Config(1))
                .transient()
                .with_finalizer(|_| Ok(())),
        );

        assert_eq!(registry.len(), 1);
        assert!(logs_contain("Finalizer of a transient provider is never called"));
    }
}
