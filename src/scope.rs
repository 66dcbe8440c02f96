/// Lifecycle of a provided instance
///
/// - [`Scope::Singleton`]: built on first resolution, cached and shared until the container is disposed.
/// - [`Scope::Transient`]: built on every resolution, never cached and never finalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Singleton,
    Transient,
}

impl Scope {
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Scope::Singleton => "singleton",
            Scope::Transient => "transient",
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn is_cached(self) -> bool {
        matches!(self, Scope::Singleton)
    }
}
