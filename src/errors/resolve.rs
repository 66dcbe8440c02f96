#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("No provider found for {token}")]
    NoProvider { token: &'static str },
    #[error("Circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency { chain: Box<[&'static str]> },
    #[error("Provider for {token} is async, it can only be resolved through async resolution")]
    AsyncProviderMisuse { token: &'static str },
    #[error("inject() / inject_async() / lazy_inject() must be called within an injection context")]
    NoActiveInjectionContext,
    #[error("Lazy binding {token} is not yet resolved. Avoid accessing it before the construction of its dependent finishes")]
    NotYetResolved { token: &'static str },
    #[error("Instance of lazy binding {token} was dropped after its container was disposed")]
    Disposed { token: &'static str },
    #[error("Failed to resolve lazy binding {token}: {source}")]
    LazyResolutionFailed {
        token: &'static str,
        #[source]
        source: Box<ResolveErrorKind>,
    },
    #[error("Incorrect instance type provided for {token}, expected: {expected}")]
    IncorrectType { token: &'static str, expected: &'static str },
    #[error(transparent)]
    Factory(anyhow::Error),
}

impl ResolveErrorKind {
    /// Tokens of the construction chain if the error is [`ResolveErrorKind::CircularDependency`]
    #[must_use]
    pub fn cycle_chain(&self) -> Option<&[&'static str]> {
        match self {
            ResolveErrorKind::CircularDependency { chain } => Some(&chain[..]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResolveErrorKind;

    use std::string::ToString as _;

    #[test]
    fn test_messages() {
        let cycle = ResolveErrorKind::CircularDependency {
            chain: Box::new(["ApiService", "AuthService", "ApiService"]),
        };
        assert_eq!(
            cycle.to_string(),
            "Circular dependency detected: ApiService -> AuthService -> ApiService"
        );
        assert_eq!(cycle.cycle_chain().map(<[_]>::len), Some(3));

        let lazy = ResolveErrorKind::LazyResolutionFailed {
            token: "A",
            source: Box::new(ResolveErrorKind::NoProvider { token: "B" }),
        };
        assert_eq!(lazy.to_string(), "Failed to resolve lazy binding A: No provider found for B");
        assert!(lazy.cycle_chain().is_none());
    }
}
