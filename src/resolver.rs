use std::sync::Arc;
use tracing::{debug, debug_span, error, Instrument as _};

use crate::{
    any::{downcast, RcAny},
    container::Container,
    context::{self, WithContext},
    errors::ResolveErrorKind,
    frame::{Frame, FrameGuard},
    instantiator::{BoxedAsyncInstantiator, BoxedInstantiator, Instantiator},
    lazy::{AsyncLazy, Lazy, LazyHandle, OptionalAsyncLazy, OptionalLazy, PendingLazy},
    registry::ProviderData,
    token::{Token, TokenInfo},
    utils::future::BoxFuture,
};

/// Handle to the container passed to factories.
///
/// A resolver knows which tokens are under construction above it, so it detects circular dependencies
/// and queues lazy bindings of the factory it was passed to.
/// The root resolver returned by [`Container::resolver`] has no construction in progress.
#[derive(Clone)]
pub struct Resolver {
    container: Container,
    frame: Option<Arc<Frame>>,
}

impl Resolver {
    #[inline]
    #[must_use]
    pub(crate) const fn root(container: Container) -> Self {
        Self { container, frame: None }
    }

    #[inline]
    #[must_use]
    fn child(&self, frame: Arc<Frame>) -> Self {
        Self {
            container: self.container.clone(),
            frame: Some(frame),
        }
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Resolves the token synchronously, singletons are constructed at most once per container
    ///
    /// # Errors
    /// - Returns [`ResolveErrorKind::NoProvider`] if the token isn't registered
    /// - Returns [`ResolveErrorKind::CircularDependency`] if the token is already under construction
    /// - Returns [`ResolveErrorKind::AsyncProviderMisuse`] if the provider is async
    /// - Returns the error of the factory or of a lazy binding it requested
    pub fn resolve<T: Send + Sync + 'static>(&self, token: Token<T>) -> Result<Arc<T>, ResolveErrorKind> {
        let dependency = self
            .get_erased(token.info(), false)?
            .ok_or(ResolveErrorKind::NoProvider { token: token.name() })?;
        downcast(token.name(), dependency)
    }

    /// Same as [`Resolver::resolve`], but returns `None` if the token isn't registered
    ///
    /// # Errors
    /// Returns every error of [`Resolver::resolve`] except [`ResolveErrorKind::NoProvider`] for the token itself
    pub fn resolve_optional<T: Send + Sync + 'static>(&self, token: Token<T>) -> Result<Option<Arc<T>>, ResolveErrorKind> {
        self.get_erased(token.info(), true)?
            .map(|dependency| downcast(token.name(), dependency))
            .transpose()
    }

    #[inline]
    #[must_use]
    pub fn resolve_lazy<T: Send + Sync + 'static>(&self, token: Token<T>) -> Lazy<T> {
        Lazy::new(self.clone(), token)
    }

    #[inline]
    #[must_use]
    pub fn resolve_lazy_optional<T: Send + Sync + 'static>(&self, token: Token<T>) -> OptionalLazy<T> {
        OptionalLazy::new(self.clone(), token)
    }

    /// Resolves the token, awaiting async factories. Sync providers are resolved as by [`Resolver::resolve`].
    ///
    /// Concurrent resolutions of the same singleton share one construction.
    ///
    /// # Errors
    /// Returns the same errors as [`Resolver::resolve`], except [`ResolveErrorKind::AsyncProviderMisuse`]
    pub async fn resolve_async<T: Send + Sync + 'static>(&self, token: Token<T>) -> Result<Arc<T>, ResolveErrorKind> {
        let dependency = self
            .get_erased_async(token.info(), false)
            .await?
            .ok_or(ResolveErrorKind::NoProvider { token: token.name() })?;
        downcast(token.name(), dependency)
    }

    /// # Errors
    /// Returns every error of [`Resolver::resolve_async`] except [`ResolveErrorKind::NoProvider`] for the token itself
    pub async fn resolve_async_optional<T: Send + Sync + 'static>(
        &self,
        token: Token<T>,
    ) -> Result<Option<Arc<T>>, ResolveErrorKind> {
        self.get_erased_async(token.info(), true)
            .await?
            .map(|dependency| downcast(token.name(), dependency))
            .transpose()
    }

    #[inline]
    #[must_use]
    pub fn resolve_async_lazy<T: Send + Sync + 'static>(&self, token: Token<T>) -> AsyncLazy<T> {
        AsyncLazy::new(self.clone(), token)
    }

    #[inline]
    #[must_use]
    pub fn resolve_async_lazy_optional<T: Send + Sync + 'static>(&self, token: Token<T>) -> OptionalAsyncLazy<T> {
        OptionalAsyncLazy::new(self.clone(), token)
    }

    /// Requests a lazy binding, the handle is filled right after the running factory returns.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::NoActiveInjectionContext`] if the resolver isn't passed to a running factory
    pub fn lazy_resolve<T: Send + Sync + 'static>(&self, token: Token<T>) -> Result<LazyHandle<T>, ResolveErrorKind> {
        let Some(frame) = self.frame.as_deref().filter(|frame| frame.is_active()) else {
            let err = ResolveErrorKind::NoActiveInjectionContext;
            error!("{}", err);
            return Err(err);
        };

        let (pending, handle) = PendingLazy::new(token);
        frame.queue.push(pending);

        debug!(token = token.name(), frame = frame.token.name, "Lazy binding queued");

        Ok(handle)
    }

    fn check_cycle(&self, token: TokenInfo) -> Result<(), ResolveErrorKind> {
        let Some(frame) = &self.frame else {
            return Ok(());
        };
        if !frame.is_constructing(token.key) {
            return Ok(());
        }

        let mut chain = frame.chain();
        chain.push(token.name);

        let err = ResolveErrorKind::CircularDependency {
            chain: chain.into_boxed_slice(),
        };
        error!("{}", err);
        Err(err)
    }

    pub(crate) fn get_erased(&self, token: TokenInfo, optional: bool) -> Result<Option<RcAny>, ResolveErrorKind> {
        let span = debug_span!("resolve", token = token.name);
        let _guard = span.enter();

        self.check_cycle(token)?;

        let Some(ProviderData {
            instantiator, scope, finalizer, ..
        }) = self.container.provider(token, optional)?
        else {
            debug!("Provider not found, resolved as none");
            return Ok(None);
        };
        let Instantiator::Sync(instantiator) = instantiator else {
            let err = ResolveErrorKind::AsyncProviderMisuse { token: token.name };
            error!("{}", err);
            return Err(err);
        };

        if !scope.is_cached() {
            let frame = Frame::new(token, self.frame.clone());
            let _frame_guard = FrameGuard::new(frame.clone());

            let dependency = self.construct(&frame, &instantiator)?;
            self.drain_lazy(&frame)?;
            return Ok(Some(dependency));
        }

        if let Some(dependency) = self.container.cached(token) {
            debug!("Found in cache");
            return Ok(Some(dependency));
        }
        debug!("Not found in cache");

        let slot = self.container.slot(token);
        let _construction = slot.lock_construction();
        if let Some(dependency) = slot.get() {
            debug!("Found in cache after waiting for construction");
            return Ok(Some(dependency.clone()));
        }

        let frame = Frame::new(token, self.frame.clone());
        let _frame_guard = FrameGuard::new(frame.clone());

        let dependency = self.construct(&frame, &instantiator)?;
        let dependency = match slot.cell.set(dependency.clone()) {
            Ok(()) => {
                debug!("Cached");
                self.container.push_resolved(token, &dependency, finalizer);
                dependency
            }
            Err(_) => slot.get().cloned().unwrap_or(dependency),
        };

        self.drain_lazy(&frame)?;

        Ok(Some(dependency))
    }

    fn construct(&self, frame: &Arc<Frame>, instantiator: &BoxedInstantiator) -> Result<RcAny, ResolveErrorKind> {
        let resolver = self.child(frame.clone());
        let result = {
            let _context = context::enter(resolver.clone());
            instantiator(&resolver)
        };

        result.map_err(|err| {
            let err = ResolveErrorKind::from(err);
            error!("{}", err);
            err
        })
    }

    /// Resolves lazy bindings requested by the factory of the frame.
    ///
    /// A binding whose token is still under construction above is handed to the frame that constructs it,
    /// so it gets the instance that frame is about to cache.
    fn drain_lazy(&self, frame: &Frame) -> Result<(), ResolveErrorKind> {
        while let Some(pending) = frame.queue.pop() {
            let Some(pending) = self.hand_over(pending) else {
                continue;
            };
            let token = pending.token;

            self.get_erased(token, false)
                .and_then(|dependency| dependency.ok_or(ResolveErrorKind::NoProvider { token: token.name }))
                .and_then(|dependency| pending.settle(dependency, self.container.scope(token)))
                .map_err(|err| lazy_error(token, err))?;

            debug!(token = token.name, "Lazy binding resolved");
        }
        Ok(())
    }

    fn hand_over(&self, pending: PendingLazy) -> Option<PendingLazy> {
        match &self.frame {
            Some(frame) => frame.hand_over(pending),
            None => Some(pending),
        }
    }

    pub(crate) fn get_erased_async(
        &self,
        token: TokenInfo,
        optional: bool,
    ) -> BoxFuture<'static, Result<Option<RcAny>, ResolveErrorKind>> {
        let resolver = self.clone();
        Box::pin(
            async move { resolver.get_erased_async_inner(token, optional).await }
                .instrument(debug_span!("resolve_async", token = token.name)),
        )
    }

    async fn get_erased_async_inner(&self, token: TokenInfo, optional: bool) -> Result<Option<RcAny>, ResolveErrorKind> {
        self.check_cycle(token)?;

        let Some(ProviderData {
            instantiator, scope, finalizer, ..
        }) = self.container.provider(token, optional)?
        else {
            debug!("Provider not found, resolved as none");
            return Ok(None);
        };
        let instantiator = match instantiator {
            Instantiator::Sync(_) => {
                debug!("Sync provider, resolving synchronously");
                return self.get_erased(token, optional);
            }
            Instantiator::Async(instantiator) => instantiator,
        };

        let frame = Frame::new(token, self.frame.clone());
        let _frame_guard = FrameGuard::new(frame.clone());

        if !scope.is_cached() {
            let dependency = self.construct_async(&frame, &instantiator).await?;
            self.drain_lazy_async(&frame).await?;
            return Ok(Some(dependency));
        }

        let slot = self.container.slot(token);
        if let Some(dependency) = slot.get() {
            debug!("Found in cache");
            return Ok(Some(dependency.clone()));
        }
        debug!("Not found in cache");

        let mut constructed = false;
        let dependency = slot
            .cell
            .get_or_try_init(|| {
                constructed = true;
                self.construct_async(&frame, &instantiator)
            })
            .await?
            .clone();

        if constructed {
            debug!("Cached");
            self.container.push_resolved(token, &dependency, finalizer);
            self.drain_lazy_async(&frame).await?;
        } else {
            debug!("Constructed by a concurrent resolution");
        }

        Ok(Some(dependency))
    }

    async fn construct_async(&self, frame: &Arc<Frame>, instantiator: &BoxedAsyncInstantiator) -> Result<RcAny, ResolveErrorKind> {
        let resolver = self.child(frame.clone());

        WithContext::new(resolver.clone(), instantiator(resolver)).await.map_err(|err| {
            let err = ResolveErrorKind::from(err);
            error!("{}", err);
            err
        })
    }

    async fn drain_lazy_async(&self, frame: &Frame) -> Result<(), ResolveErrorKind> {
        while let Some(pending) = frame.queue.pop() {
            let Some(pending) = self.hand_over(pending) else {
                continue;
            };
            let token = pending.token;

            let result = self.get_erased_async(token, false).await;
            result
                .and_then(|dependency| dependency.ok_or(ResolveErrorKind::NoProvider { token: token.name }))
                .and_then(|dependency| pending.settle(dependency, self.container.scope(token)))
                .map_err(|err| lazy_error(token, err))?;

            debug!(token = token.name, "Lazy binding resolved");
        }
        Ok(())
    }
}

fn lazy_error(token: TokenInfo, err: ResolveErrorKind) -> ResolveErrorKind {
    let err = ResolveErrorKind::LazyResolutionFailed {
        token: token.name,
        source: Box::new(err),
    };
    error!("{}", err);
    err
}
