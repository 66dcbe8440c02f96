use std::{future::Future, sync::Arc};

use crate::{
    errors::InstantiateResult,
    finalizer::{boxed_async_finalizer, boxed_finalizer, AsyncDispose, BoxedFinalizer, Dispose},
    instantiator::{boxed_async_instantiator, boxed_instantiator, Instantiator},
    registry::ProviderData,
    resolver::Resolver,
    scope::Scope,
    token::Token,
};

/// Binding of a token to the factory that constructs its instance.
///
/// Providers are singletons by default, use [`Provider::transient`] to construct a new instance on every resolution.
pub struct Provider<T> {
    token: Token<T>,
    instantiator: Instantiator,
    scope: Scope,
    finalizer: Option<BoxedFinalizer>,
}

impl<T: Send + Sync + 'static> Provider<T> {
    /// Creates a provider with a sync factory.
    ///
    /// The factory receives the resolver of its construction, dependencies resolved through it
    /// take part in cycle detection. [`crate::inject`] can be used inside the factory as well.
    #[must_use]
    pub fn new<F>(token: Token<T>, factory: F) -> Self
    where
        F: Fn(&Resolver) -> InstantiateResult<T> + Send + Sync + 'static,
    {
        Self {
            token,
            instantiator: Instantiator::Sync(boxed_instantiator(factory)),
            scope: Scope::default(),
            finalizer: None,
        }
    }

    /// Creates a provider with an async factory, it can only be resolved by async resolution
    #[must_use]
    pub fn new_async<F, Fut>(token: Token<T>, factory: F) -> Self
    where
        F: Fn(Resolver) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = InstantiateResult<T>> + Send + 'static,
    {
        Self {
            token,
            instantiator: Instantiator::Async(boxed_async_instantiator(factory)),
            scope: Scope::default(),
            finalizer: None,
        }
    }

    /// Creates a provider that returns a clone of the value on construction
    #[must_use]
    pub fn value(token: Token<T>, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(token, move |_| Ok(value.clone()))
    }

    #[inline]
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    #[inline]
    #[must_use]
    pub fn transient(self) -> Self {
        self.with_scope(Scope::Transient)
    }

    /// Sets the teardown called for the cached instance when the container is disposed.
    ///
    /// # Warning
    /// Transient instances aren't tracked, so a finalizer of a transient provider is never called
    #[must_use]
    pub fn with_finalizer<F>(mut self, finalizer: F) -> Self
    where
        F: Fn(Arc<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.finalizer = Some(boxed_finalizer(self.token.name(), finalizer));
        self
    }

    #[must_use]
    pub fn with_async_finalizer<F, Fut>(mut self, finalizer: F) -> Self
    where
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.finalizer = Some(boxed_async_finalizer(self.token.name(), finalizer));
        self
    }

    /// Uses [`Dispose`] of the instance as its finalizer
    #[inline]
    #[must_use]
    pub fn disposable(self) -> Self
    where
        T: Dispose,
    {
        self.with_finalizer(|dependency: Arc<T>| Dispose::dispose(&*dependency))
    }

    /// Uses [`AsyncDispose`] of the instance as its finalizer
    #[inline]
    #[must_use]
    pub fn async_disposable(self) -> Self
    where
        T: AsyncDispose,
    {
        self.with_async_finalizer(|dependency: Arc<T>| async move { AsyncDispose::dispose(&*dependency).await })
    }
}

impl<T> Provider<T> {
    #[inline]
    #[must_use]
    pub const fn token(&self) -> Token<T> {
        self.token
    }

    #[inline]
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    #[must_use]
    pub const fn is_async(&self) -> bool {
        self.instantiator.is_async()
    }

    #[inline]
    #[must_use]
    pub fn has_finalizer(&self) -> bool {
        self.finalizer.is_some()
    }

    #[must_use]
    pub(crate) fn into_data(self) -> ProviderData {
        ProviderData {
            token: self.token.info(),
            instantiator: self.instantiator,
            scope: self.scope,
            finalizer: self.finalizer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Provider;
    use crate::{errors::InstantiateErrorKind, finalizer::Dispose, scope::Scope, token::Token};

    use tracing_test::traced_test;

    #[derive(Clone)]
    struct Config;

    struct Connection;

    impl Dispose for Connection {
        fn dispose(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    #[traced_test]
    fn test_builder() {
        let config = Provider::value(Token::<Config>::new("CONFIG"), Config);
        assert_eq!(config.scope(), Scope::Singleton);
        assert!(!config.is_async());
        assert!(!config.has_finalizer());
        assert_eq!(config.token().name(), "CONFIG");

        let connection = Provider::new_async(Token::<Connection>::of(), |_| async { Ok::<_, InstantiateErrorKind>(Connection) })
            .transient()
            .disposable();
        assert_eq!(connection.scope(), Scope::Transient);
        assert!(connection.is_async());
        assert!(connection.has_finalizer());

        let data = connection.with_scope(Scope::Singleton).into_data();
        assert_eq!(data.token.name(), "Connection");
        assert!(data.scope.is_cached());
        assert!(data.finalizer.is_some());
    }
}
