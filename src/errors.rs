mod dispose;
mod instantiate;
mod resolve;

pub use dispose::{DisposeError, DisposeFailure};
pub use instantiate::InstantiateErrorKind;
pub use resolve::ResolveErrorKind;

/// Result returned by provider factories
pub type InstantiateResult<T, Err = InstantiateErrorKind> = Result<T, Err>;
