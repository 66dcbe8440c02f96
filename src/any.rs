use std::{
    any::{type_name, Any, TypeId},
    sync::Arc,
};

use crate::errors::ResolveErrorKind;

pub(crate) type RcAny = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TypeInfo {
    pub(crate) name: &'static str,
    pub(crate) id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub(crate) fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Type name without its module path, generic arguments are kept as is.
    /// Names of tuples, arrays, slices and references are returned in full.
    #[inline]
    #[must_use]
    pub(crate) fn short_name(&self) -> &'static str {
        if self.name.starts_with(['(', '[', '&']) {
            return self.name;
        }
        let path = self.name.split_once('<').map_or(self.name, |(path, _)| path);
        match path.rsplit_once("::") {
            Some((module, _)) => &self.name[module.len() + 2..],
            None => self.name,
        }
    }
}

/// Restores the concrete type of an erased instance stored under `token`
pub(crate) fn downcast<T: Send + Sync + 'static>(token: &'static str, dependency: RcAny) -> Result<Arc<T>, ResolveErrorKind> {
    dependency.downcast::<T>().map_err(|_| ResolveErrorKind::IncorrectType {
        token,
        expected: type_name::<T>(),
    })
}
