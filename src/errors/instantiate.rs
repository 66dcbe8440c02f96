use super::resolve::ResolveErrorKind;

/// Error returned by a provider factory.
///
/// Nested resolution errors are kept as is, so `?` on a nested resolution inside a factory
/// propagates the original error (for example, [`ResolveErrorKind::CircularDependency`]) to the caller unchanged.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}

impl From<InstantiateErrorKind> for ResolveErrorKind {
    #[inline]
    fn from(err: InstantiateErrorKind) -> Self {
        match err {
            InstantiateErrorKind::Resolve(err) => *err,
            InstantiateErrorKind::Custom(err) => ResolveErrorKind::Factory(err),
        }
    }
}
