use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    any::RcAny,
    cache::{Cache, Resolved, Slot},
    errors::{DisposeError, DisposeFailure, ResolveErrorKind},
    finalizer::BoxedFinalizer,
    lazy::{AsyncLazy, Lazy, OptionalAsyncLazy, OptionalLazy},
    provider::Provider,
    registry::{ProviderData, Registry},
    resolver::Resolver,
    scope::Scope,
    token::{Token, TokenInfo},
};

/// Dependency injection container.
///
/// Cheap to clone, clones share providers and cached singletons.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    registry: RwLock<Registry>,
    cache: Mutex<Cache>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

impl Container {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(registry),
                cache: Mutex::new(Cache::new()),
            }),
        }
    }

    /// Registers the provider, replacing a provider of the same token.
    ///
    /// # Warning
    /// An already cached singleton of the token isn't evicted, the new provider is used after [`Container::dispose`]
    pub fn register<T: Send + Sync + 'static>(&self, provider: Provider<T>) -> &Self {
        self.inner.registry.write().add(provider);
        self
    }

    #[must_use]
    pub fn is_registered<T>(&self, token: Token<T>) -> bool {
        self.inner.registry.read().contains(token)
    }

    /// Root resolver of the container, no construction is in progress for it
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> Resolver {
        Resolver::root(self.clone())
    }

    /// Resolves the token synchronously
    ///
    /// # Errors
    /// See [`Resolver::resolve`]
    #[inline]
    pub fn resolve<T: Send + Sync + 'static>(&self, token: Token<T>) -> Result<Arc<T>, ResolveErrorKind> {
        self.resolver().resolve(token)
    }

    /// # Errors
    /// See [`Resolver::resolve_optional`]
    #[inline]
    pub fn resolve_optional<T: Send + Sync + 'static>(&self, token: Token<T>) -> Result<Option<Arc<T>>, ResolveErrorKind> {
        self.resolver().resolve_optional(token)
    }

    #[inline]
    #[must_use]
    pub fn resolve_lazy<T: Send + Sync + 'static>(&self, token: Token<T>) -> Lazy<T> {
        self.resolver().resolve_lazy(token)
    }

    #[inline]
    #[must_use]
    pub fn resolve_lazy_optional<T: Send + Sync + 'static>(&self, token: Token<T>) -> OptionalLazy<T> {
        self.resolver().resolve_lazy_optional(token)
    }

    /// Resolves the token, awaiting async factories
    ///
    /// # Errors
    /// See [`Resolver::resolve_async`]
    pub async fn resolve_async<T: Send + Sync + 'static>(&self, token: Token<T>) -> Result<Arc<T>, ResolveErrorKind> {
        self.resolver().resolve_async(token).await
    }

    /// # Errors
    /// See [`Resolver::resolve_async_optional`]
    pub async fn resolve_async_optional<T: Send + Sync + 'static>(
        &self,
        token: Token<T>,
    ) -> Result<Option<Arc<T>>, ResolveErrorKind> {
        self.resolver().resolve_async_optional(token).await
    }

    #[inline]
    #[must_use]
    pub fn resolve_async_lazy<T: Send + Sync + 'static>(&self, token: Token<T>) -> AsyncLazy<T> {
        self.resolver().resolve_async_lazy(token)
    }

    #[inline]
    #[must_use]
    pub fn resolve_async_lazy_optional<T: Send + Sync + 'static>(&self, token: Token<T>) -> OptionalAsyncLazy<T> {
        self.resolver().resolve_async_lazy_optional(token)
    }

    /// Disposes the container, calling finalizers of cached singletons in their construction order.
    ///
    /// A failed finalizer doesn't stop disposal, every failure is collected into the returned error.
    /// The singleton cache is cleared afterwards, so the container stays usable
    /// and singletons are constructed again if resolved after disposal.
    ///
    /// # Errors
    /// Returns [`DisposeError`] listing every failed finalizer
    pub async fn dispose(&self) -> Result<(), DisposeError> {
        let resolved = self.inner.cache.lock().take_resolved_set();
        debug!(count = resolved.len(), "Disposing container");

        let mut failures = Vec::new();
        for Resolved {
            token,
            dependency,
            finalizer,
        } in resolved.0
        {
            match finalizer(dependency).await {
                Ok(()) => debug!(token = token.name, "Finalizer called"),
                Err(error) => {
                    error!(token = token.name, "Finalizer failed: {}", error);
                    failures.push(DisposeFailure { token: token.name, error });
                }
            }
        }

        self.inner.cache.lock().clear();
        debug!("Singleton cache cleared");

        if failures.is_empty() {
            return Ok(());
        }

        let err = DisposeError { failures };
        error!("{}", err);
        Err(err)
    }
}

impl Container {
    pub(crate) fn provider(&self, token: TokenInfo, optional: bool) -> Result<Option<ProviderData>, ResolveErrorKind> {
        Ok(self.inner.registry.read().lookup(token, optional)?.cloned())
    }

    /// Scope of the registered provider, [`Scope::Singleton`] if the token isn't registered
    #[must_use]
    pub(crate) fn scope(&self, token: TokenInfo) -> Scope {
        match self.inner.registry.read().lookup(token, true) {
            Ok(Some(data)) => data.scope,
            _ => Scope::default(),
        }
    }

    #[must_use]
    pub(crate) fn cached(&self, token: TokenInfo) -> Option<RcAny> {
        self.inner.cache.lock().get(&token.key)
    }

    #[must_use]
    pub(crate) fn slot(&self, token: TokenInfo) -> Arc<Slot> {
        self.inner.cache.lock().slot(token.key)
    }

    pub(crate) fn push_resolved(&self, token: TokenInfo, dependency: &RcAny, finalizer: Option<BoxedFinalizer>) {
        let Some(finalizer) = finalizer else {
            return;
        };
        self.inner.cache.lock().push_resolved(Resolved {
            token,
            dependency: dependency.clone(),
            finalizer,
        });
        debug!("Pushed to resolved set");
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn cached_count(&self) -> usize {
        self.inner.cache.lock().len()
    }
}
