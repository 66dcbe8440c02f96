use std::{future::Future, sync::Arc};
use tracing::debug;

use crate::{
    any::RcAny,
    errors::{InstantiateErrorKind, InstantiateResult},
    resolver::Resolver,
    utils::future::BoxFuture,
};

pub(crate) type BoxedInstantiator = Arc<dyn Fn(&Resolver) -> Result<RcAny, InstantiateErrorKind> + Send + Sync>;

pub(crate) type BoxedAsyncInstantiator =
    Arc<dyn Fn(Resolver) -> BoxFuture<'static, Result<RcAny, InstantiateErrorKind>> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Instantiator {
    Sync(BoxedInstantiator),
    Async(BoxedAsyncInstantiator),
}

impl Instantiator {
    #[inline]
    #[must_use]
    pub(crate) const fn is_async(&self) -> bool {
        matches!(self, Instantiator::Async(_))
    }
}

#[must_use]
pub(crate) fn boxed_instantiator<T, F>(factory: F) -> BoxedInstantiator
where
    T: Send + Sync + 'static,
    F: Fn(&Resolver) -> InstantiateResult<T> + Send + Sync + 'static,
{
    Arc::new(move |resolver: &Resolver| -> Result<RcAny, InstantiateErrorKind> {
        let dependency = factory(resolver)?;

        debug!("Instantiated");

        Ok(Arc::new(dependency) as RcAny)
    })
}

#[must_use]
pub(crate) fn boxed_async_instantiator<T, F, Fut>(factory: F) -> BoxedAsyncInstantiator
where
    T: Send + Sync + 'static,
    F: Fn(Resolver) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = InstantiateResult<T>> + Send + 'static,
{
    Arc::new(move |resolver: Resolver| -> BoxFuture<'static, Result<RcAny, InstantiateErrorKind>> {
        let future = factory(resolver);

        Box::pin(async move {
            let dependency = future.await?;

            debug!("Instantiated");

            Ok(Arc::new(dependency) as RcAny)
        })
    })
}
