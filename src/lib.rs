pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod container;
pub(crate) mod context;
pub(crate) mod errors;
pub(crate) mod finalizer;
pub(crate) mod frame;
pub(crate) mod inject;
pub(crate) mod instantiator;
pub(crate) mod lazy;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod scope;
pub(crate) mod token;
pub(crate) mod utils;

pub use container::Container;
pub use context::current_resolver;
pub use errors::{DisposeError, DisposeFailure, InstantiateErrorKind, InstantiateResult, ResolveErrorKind};
pub use finalizer::{AsyncDispose, Dispose};
pub use inject::{
    inject, inject_async, inject_async_lazy, inject_async_lazy_optional, inject_async_optional, inject_lazy,
    inject_lazy_optional, inject_optional, lazy_inject,
};
pub use lazy::{AsyncLazy, Lazy, LazyHandle, OptionalAsyncLazy, OptionalLazy};
pub use provider::Provider;
pub use registry::Registry;
pub use resolver::Resolver;
pub use scope::Scope;
pub use token::{Token, TokenInfo};
