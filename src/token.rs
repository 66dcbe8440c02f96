use std::{
    any::TypeId,
    cmp::Ordering,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
};

use crate::any::TypeInfo;

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum TokenKey {
    Id(u64),
    Type(TypeId),
}

/// Untyped part of a [`Token`]: its identity and human-readable name.
///
/// Equality and ordering use the identity only, the name is for diagnostics.
#[derive(Clone, Copy)]
pub struct TokenInfo {
    pub(crate) key: TokenKey,
    pub(crate) name: &'static str,
}

impl TokenInfo {
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TokenInfo {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TokenInfo {}

impl PartialOrd for TokenInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TokenInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for TokenInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Debug for TokenInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenInfo").field("name", &self.name).field("key", &self.key).finish()
    }
}

impl Display for TokenInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Opaque identifier of a service that resolves to `Arc<T>`.
///
/// Two tokens are equal only by identity: [`Token::new`] always creates a new identity,
/// even for an already used name, so differently typed services can't collide.
/// [`Token::of`] creates a token keyed by the type itself, so every call for the same `T` is the same token.
///
/// ```rust
/// use resolid_di::Token;
///
/// struct Database;
///
/// let first = Token::<Database>::new("DATABASE");
/// let second = Token::<Database>::new("DATABASE");
/// assert_ne!(first, second);
/// assert_eq!(Token::<Database>::of(), Token::<Database>::of());
/// ```
pub struct Token<T> {
    info: TokenInfo,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> Token<T> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            info: TokenInfo {
                key: TokenKey::Id(NEXT_TOKEN_ID.fetch_add(1, AtomicOrdering::Relaxed)),
                name,
            },
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn of() -> Self {
        let type_info = TypeInfo::of::<T>();
        Self {
            info: TokenInfo {
                key: TokenKey::Type(type_info.id),
                name: type_info.short_name(),
            },
            _marker: PhantomData,
        }
    }
}

impl<T> Token<T> {
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.info.name
    }

    #[inline]
    #[must_use]
    pub const fn info(&self) -> TokenInfo {
        self.info
    }
}

impl<T> Clone for Token<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Token<T> {}

impl<T> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl<T> Eq for Token<T> {}

impl<T> Hash for Token<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.hash(state);
    }
}

impl<T> Debug for Token<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.info.name).finish()
    }
}

impl<T> Display for Token<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.info.name)
    }
}

#[cfg(test)]
mod tests {
    use super::Token;

    use std::string::ToString as _;

    struct LogService;
    struct UserService;

    #[test]
    fn test_identity() {
        let token = Token::<LogService>::new("LOG");
        let same_name = Token::<LogService>::new("LOG");

        assert_eq!(token, token.clone());
        assert_ne!(token, same_name);
        assert_ne!(token.info(), Token::<UserService>::new("LOG").info());
    }

    #[test]
    fn test_type_token() {
        assert_eq!(Token::<LogService>::of(), Token::<LogService>::of());
        assert_ne!(Token::<LogService>::of().info(), Token::<UserService>::of().info());
        assert_eq!(Token::<LogService>::of().name(), "LogService");
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::<LogService>::new("").to_string(), "");
        assert_eq!(Token::<LogService>::new("LOG").to_string(), "LOG");
    }
}
