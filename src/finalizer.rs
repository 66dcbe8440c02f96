use std::{
    future::{ready, Future},
    sync::Arc,
};

use crate::{
    any::{downcast, RcAny},
    utils::future::BoxFuture,
};

/// Teardown capability of a service, called once per cached instance when the container is disposed.
///
/// Register it with [`crate::Provider::disposable`].
pub trait Dispose: Send + Sync + 'static {
    fn dispose(&self) -> anyhow::Result<()>;
}

/// Async version of [`Dispose`], register it with [`crate::Provider::async_disposable`]
pub trait AsyncDispose: Send + Sync + 'static {
    fn dispose(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub(crate) type BoxedFinalizer = Arc<dyn Fn(RcAny) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

#[must_use]
pub(crate) fn boxed_finalizer<Dep, F>(token: &'static str, finalizer: F) -> BoxedFinalizer
where
    Dep: Send + Sync + 'static,
    F: Fn(Arc<Dep>) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(move |dependency: RcAny| -> BoxFuture<'static, anyhow::Result<()>> {
        let result = match downcast::<Dep>(token, dependency) {
            Ok(dependency) => finalizer(dependency),
            Err(err) => Err(err.into()),
        };
        Box::pin(ready(result))
    })
}

#[must_use]
pub(crate) fn boxed_async_finalizer<Dep, F, Fut>(token: &'static str, finalizer: F) -> BoxedFinalizer
where
    Dep: Send + Sync + 'static,
    F: Fn(Arc<Dep>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |dependency: RcAny| -> BoxFuture<'static, anyhow::Result<()>> {
        match downcast::<Dep>(token, dependency) {
            Ok(dependency) => Box::pin(finalizer(dependency)),
            Err(err) => Box::pin(ready(Err(err.into()))),
        }
    })
}
