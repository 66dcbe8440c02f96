use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub struct DisposeFailure {
    pub token: &'static str,
    pub error: anyhow::Error,
}

/// One or more finalizers failed while the container was being disposed.
///
/// Every failing token is listed, disposal doesn't stop on the first failure.
#[derive(thiserror::Error, Debug)]
pub struct DisposeError {
    pub failures: Vec<DisposeFailure>,
}

impl Display for DisposeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to dispose {} provider(s): ", self.failures.len())?;
        for (index, DisposeFailure { token, error }) in self.failures.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{token}: {error}")?;
        }
        Ok(())
    }
}
