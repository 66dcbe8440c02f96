use parking_lot::Mutex;
use std::{
    collections::VecDeque,
    fmt::{self, Debug, Formatter},
    sync::{Arc, OnceLock, Weak},
};
use tokio::sync::OnceCell;

use crate::{
    any::{downcast, RcAny},
    errors::ResolveErrorKind,
    resolver::Resolver,
    scope::Scope,
    token::{Token, TokenInfo},
};

type Settle = Box<dyn FnOnce(RcAny, Scope) -> Result<(), ResolveErrorKind> + Send>;

/// Instance a lazy binding was settled with.
///
/// A cached instance is owned by the container, so the handle keeps only a weak reference to it
/// and a cycle of lazy bindings doesn't keep the singletons alive after disposal.
/// A transient instance has no other owner.
enum Settled<T> {
    Shared(Weak<T>),
    Owned(Arc<T>),
}

/// Lazy binding waiting for its dependent to finish construction
pub(crate) struct PendingLazy {
    pub(crate) token: TokenInfo,
    settle: Settle,
}

impl PendingLazy {
    #[must_use]
    pub(crate) fn new<T: Send + Sync + 'static>(token: Token<T>) -> (Self, LazyHandle<T>) {
        let handle = LazyHandle {
            token: token.info(),
            cell: Arc::new(OnceLock::new()),
        };
        let cell = handle.cell.clone();
        let pending = Self {
            token: token.info(),
            settle: Box::new(move |dependency, scope| {
                let dependency = downcast::<T>(token.name(), dependency)?;
                let settled = match scope {
                    Scope::Singleton => Settled::Shared(Arc::downgrade(&dependency)),
                    Scope::Transient => Settled::Owned(dependency),
                };
                let _ = cell.set(settled);
                Ok(())
            }),
        };
        (pending, handle)
    }

    #[inline]
    pub(crate) fn settle(self, dependency: RcAny, scope: Scope) -> Result<(), ResolveErrorKind> {
        (self.settle)(dependency, scope)
    }
}

#[derive(Default)]
pub(crate) struct LazyQueue(Mutex<VecDeque<PendingLazy>>);

impl LazyQueue {
    #[inline]
    pub(crate) fn push(&self, pending: PendingLazy) {
        self.0.lock().push_back(pending);
    }

    #[inline]
    #[must_use]
    pub(crate) fn pop(&self) -> Option<PendingLazy> {
        self.0.lock().pop_front()
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.0.lock().len()
    }
}

/// Handle of a lazy binding returned by [`crate::lazy_inject`] and [`Resolver::lazy_resolve`].
///
/// It's filled right after the factory that requested it returns, so it breaks cycles like
/// `A -> B -> A` where `B` only needs `A` after construction.
/// The handle doesn't own a singleton it points to, the singleton lives as long as the container caches it.
pub struct LazyHandle<T> {
    token: TokenInfo,
    cell: Arc<OnceLock<Settled<T>>>,
}

impl<T> LazyHandle<T> {
    /// # Errors
    /// - Returns [`ResolveErrorKind::NotYetResolved`] if the factory that requested the binding is still running
    /// - Returns [`ResolveErrorKind::Disposed`] if the singleton was dropped after disposal of its container
    pub fn value(&self) -> Result<Arc<T>, ResolveErrorKind> {
        match self.cell.get() {
            Some(Settled::Shared(dependency)) => dependency
                .upgrade()
                .ok_or(ResolveErrorKind::Disposed { token: self.token.name }),
            Some(Settled::Owned(dependency)) => Ok(dependency.clone()),
            None => Err(ResolveErrorKind::NotYetResolved { token: self.token.name }),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    #[inline]
    #[must_use]
    pub const fn token(&self) -> TokenInfo {
        self.token
    }
}

impl<T> Clone for LazyHandle<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token,
            cell: self.cell.clone(),
        }
    }
}

impl<T> Debug for LazyHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyHandle")
            .field("token", &self.token.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Deferred sync resolution, the token is resolved on the first [`Lazy::get`] and memoized
pub struct Lazy<T> {
    resolver: Resolver,
    token: Token<T>,
    cell: OnceLock<Arc<T>>,
}

impl<T: Send + Sync + 'static> Lazy<T> {
    #[inline]
    #[must_use]
    pub(crate) fn new(resolver: Resolver, token: Token<T>) -> Self {
        Self {
            resolver,
            token,
            cell: OnceLock::new(),
        }
    }

    /// # Errors
    /// Returns the error of the underlying resolution, a failed resolution isn't memoized
    pub fn get(&self) -> Result<Arc<T>, ResolveErrorKind> {
        if let Some(dependency) = self.cell.get() {
            return Ok(dependency.clone());
        }
        let dependency = self.resolver.resolve(self.token)?;
        Ok(self.cell.get_or_init(|| dependency).clone())
    }
}

/// Same as [`Lazy`], but the token may be unregistered
pub struct OptionalLazy<T> {
    resolver: Resolver,
    token: Token<T>,
    cell: OnceLock<Option<Arc<T>>>,
}

impl<T: Send + Sync + 'static> OptionalLazy<T> {
    #[inline]
    #[must_use]
    pub(crate) fn new(resolver: Resolver, token: Token<T>) -> Self {
        Self {
            resolver,
            token,
            cell: OnceLock::new(),
        }
    }

    /// # Errors
    /// Returns the error of the underlying resolution, a missing provider isn't an error
    pub fn get(&self) -> Result<Option<Arc<T>>, ResolveErrorKind> {
        if let Some(dependency) = self.cell.get() {
            return Ok(dependency.clone());
        }
        let dependency = self.resolver.resolve_optional(self.token)?;
        Ok(self.cell.get_or_init(|| dependency).clone())
    }
}

/// Deferred async resolution, concurrent callers of [`AsyncLazy::get`] share one resolution
pub struct AsyncLazy<T> {
    resolver: Resolver,
    token: Token<T>,
    cell: OnceCell<Arc<T>>,
}

impl<T: Send + Sync + 'static> AsyncLazy<T> {
    #[inline]
    #[must_use]
    pub(crate) fn new(resolver: Resolver, token: Token<T>) -> Self {
        Self {
            resolver,
            token,
            cell: OnceCell::new(),
        }
    }

    /// # Errors
    /// Returns the error of the underlying resolution, a failed resolution isn't memoized
    pub async fn get(&self) -> Result<Arc<T>, ResolveErrorKind> {
        self.cell
            .get_or_try_init(|| self.resolver.resolve_async(self.token))
            .await
            .cloned()
    }
}

pub struct OptionalAsyncLazy<T> {
    resolver: Resolver,
    token: Token<T>,
    cell: OnceCell<Option<Arc<T>>>,
}

impl<T: Send + Sync + 'static> OptionalAsyncLazy<T> {
    #[inline]
    #[must_use]
    pub(crate) fn new(resolver: Resolver, token: Token<T>) -> Self {
        Self {
            resolver,
            token,
            cell: OnceCell::new(),
        }
    }

    /// # Errors
    /// Returns the error of the underlying resolution, a missing provider isn't an error
    pub async fn get(&self) -> Result<Option<Arc<T>>, ResolveErrorKind> {
        self.cell
            .get_or_try_init(|| self.resolver.resolve_async_optional(self.token))
            .await
            .cloned()
    }
}
