use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::{
    collections::{BTreeMap, VecDeque},
    mem,
    sync::Arc,
};
use tokio::sync::OnceCell;

use crate::{
    any::RcAny,
    finalizer::BoxedFinalizer,
    token::{TokenInfo, TokenKey},
};

/// Write-once singleton cell of a token.
///
/// The slot is registered before construction starts, so concurrent resolvers of the same token
/// wait for the construction in progress instead of starting another one.
/// Resolvers of other tokens are never blocked by it.
pub(crate) struct Slot {
    pub(crate) cell: OnceCell<RcAny>,
    construction: ReentrantMutex<()>,
}

impl Slot {
    #[must_use]
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            construction: ReentrantMutex::new(()),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self) -> Option<&RcAny> {
        self.cell.get()
    }

    /// Serializes sync construction of the token, reentrant for nested resolutions on the same thread
    #[inline]
    #[must_use]
    pub(crate) fn lock_construction(&self) -> ReentrantMutexGuard<'_, ()> {
        self.construction.lock()
    }
}

#[derive(Default)]
pub(crate) struct Cache {
    slots: BTreeMap<TokenKey, Arc<Slot>>,
    resolved: ResolvedSet,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub(crate) fn slot(&mut self, key: TokenKey) -> Arc<Slot> {
        self.slots.entry(key).or_insert_with(|| Arc::new(Slot::new())).clone()
    }

    #[must_use]
    pub(crate) fn get(&self, key: &TokenKey) -> Option<RcAny> {
        self.slots.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Count of constructed singletons
    #[cfg(test)]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.slots.values().filter(|slot| slot.cell.initialized()).count()
    }

    #[inline]
    pub(crate) fn push_resolved(&mut self, resolved: Resolved) {
        self.resolved.push(resolved);
    }

    #[inline]
    #[must_use]
    pub(crate) fn take_resolved_set(&mut self) -> ResolvedSet {
        mem::take(&mut self.resolved)
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Constructed singleton with a finalizer, waiting for disposal
pub(crate) struct Resolved {
    pub(crate) token: TokenInfo,
    pub(crate) dependency: RcAny,
    pub(crate) finalizer: BoxedFinalizer,
}

/// Resolved singletons in construction order
#[derive(Default)]
pub(crate) struct ResolvedSet(pub(crate) VecDeque<Resolved>);

impl ResolvedSet {
    #[inline]
    pub(crate) fn push(&mut self, resolved: Resolved) {
        self.0.push_back(resolved);
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}
