use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    context::current_resolver,
    errors::ResolveErrorKind,
    lazy::{AsyncLazy, Lazy, LazyHandle, OptionalAsyncLazy, OptionalLazy},
    resolver::Resolver,
    token::Token,
};

fn active_resolver() -> Result<Resolver, ResolveErrorKind> {
    current_resolver().ok_or_else(|| {
        let err = ResolveErrorKind::NoActiveInjectionContext;
        error!("{}", err);
        err
    })
}

/// Resolves the token through the factory currently running on this thread.
///
/// It's the same as calling [`Resolver::resolve`] on the resolver passed to the factory.
///
/// # Errors
/// - Returns [`ResolveErrorKind::NoActiveInjectionContext`] if called outside of a factory
/// - Returns every error of [`Resolver::resolve`]
pub fn inject<T: Send + Sync + 'static>(token: Token<T>) -> Result<Arc<T>, ResolveErrorKind> {
    active_resolver()?.resolve(token)
}

/// Same as [`inject`], but returns `None` if the token isn't registered.
/// Outside of a factory there is nothing to resolve from, so it returns `None` as well.
///
/// # Errors
/// Returns every error of [`Resolver::resolve_optional`]
pub fn inject_optional<T: Send + Sync + 'static>(token: Token<T>) -> Result<Option<Arc<T>>, ResolveErrorKind> {
    match current_resolver() {
        Some(resolver) => resolver.resolve_optional(token),
        None => {
            debug!(token = token.name(), "No injection context, resolved as none");
            Ok(None)
        }
    }
}

/// # Errors
/// Returns [`ResolveErrorKind::NoActiveInjectionContext`] if called outside of a factory
pub fn inject_lazy<T: Send + Sync + 'static>(token: Token<T>) -> Result<Lazy<T>, ResolveErrorKind> {
    Ok(active_resolver()?.resolve_lazy(token))
}

/// Lazy version of [`inject_optional`], `None` outside of a factory
#[must_use]
pub fn inject_lazy_optional<T: Send + Sync + 'static>(token: Token<T>) -> Option<OptionalLazy<T>> {
    let Some(resolver) = current_resolver() else {
        debug!(token = token.name(), "No injection context, resolved as none");
        return None;
    };
    Some(resolver.resolve_lazy_optional(token))
}

/// Async version of [`inject`], usable across await points of an async factory
///
/// # Errors
/// - Returns [`ResolveErrorKind::NoActiveInjectionContext`] if awaited outside of a factory
/// - Returns every error of [`Resolver::resolve_async`]
pub async fn inject_async<T: Send + Sync + 'static>(token: Token<T>) -> Result<Arc<T>, ResolveErrorKind> {
    active_resolver()?.resolve_async(token).await
}

/// # Errors
/// Returns every error of [`Resolver::resolve_async_optional`]
pub async fn inject_async_optional<T: Send + Sync + 'static>(token: Token<T>) -> Result<Option<Arc<T>>, ResolveErrorKind> {
    match current_resolver() {
        Some(resolver) => resolver.resolve_async_optional(token).await,
        None => {
            debug!(token = token.name(), "No injection context, resolved as none");
            Ok(None)
        }
    }
}

/// # Errors
/// Returns [`ResolveErrorKind::NoActiveInjectionContext`] if called outside of a factory
pub fn inject_async_lazy<T: Send + Sync + 'static>(token: Token<T>) -> Result<AsyncLazy<T>, ResolveErrorKind> {
    Ok(active_resolver()?.resolve_async_lazy(token))
}

#[must_use]
pub fn inject_async_lazy_optional<T: Send + Sync + 'static>(token: Token<T>) -> Option<OptionalAsyncLazy<T>> {
    let Some(resolver) = current_resolver() else {
        debug!(token = token.name(), "No injection context, resolved as none");
        return None;
    };
    Some(resolver.resolve_async_lazy_optional(token))
}

/// Requests a lazy binding for the running factory, see [`Resolver::lazy_resolve`]
///
/// # Errors
/// Returns [`ResolveErrorKind::NoActiveInjectionContext`] if called outside of a factory
pub fn lazy_inject<T: Send + Sync + 'static>(token: Token<T>) -> Result<LazyHandle<T>, ResolveErrorKind> {
    active_resolver()?.lazy_resolve(token)
}
