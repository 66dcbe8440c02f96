use std::{
    iter,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing::debug;

use crate::{
    lazy::{LazyQueue, PendingLazy},
    token::{TokenInfo, TokenKey},
};

/// Construction of a single token.
///
/// Frames form a chain from the outermost resolution to the innermost one through their parents.
/// A frame is active only while its factory runs, resolvers which outlive the construction keep the frame,
/// but it no longer takes part in cycle detection.
pub(crate) struct Frame {
    pub(crate) token: TokenInfo,
    pub(crate) parent: Option<Arc<Frame>>,
    pub(crate) queue: LazyQueue,
    active: AtomicBool,
}

impl Frame {
    #[must_use]
    pub(crate) fn new(token: TokenInfo, parent: Option<Arc<Frame>>) -> Arc<Self> {
        Arc::new(Self {
            token,
            parent,
            queue: LazyQueue::default(),
            active: AtomicBool::new(true),
        })
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    #[inline]
    fn exit(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn ancestors(&self) -> impl Iterator<Item = &Frame> {
        iter::successors(Some(self), |frame| frame.parent.as_deref())
    }

    /// Whether the token is under construction in this frame or one of its active ancestors
    #[must_use]
    pub(crate) fn is_constructing(&self, key: TokenKey) -> bool {
        self.ancestors().any(|frame| frame.is_active() && frame.token.key == key)
    }

    /// Nearest frame that is still constructing, lazy bindings can only be drained by an active frame
    #[must_use]
    pub(crate) fn nearest_active(&self) -> Option<&Frame> {
        self.ancestors().find(|frame| frame.is_active())
    }

    /// Names of tokens under construction, from the outermost to this one
    #[must_use]
    pub(crate) fn chain(&self) -> Vec<&'static str> {
        let mut chain = self
            .ancestors()
            .filter(|frame| frame.is_active())
            .map(|frame| frame.token.name)
            .collect::<Vec<_>>();
        chain.reverse();
        chain
    }

    /// Moves the pending binding to the frame that constructs its token.
    ///
    /// Returns the binding back if nobody in the chain constructs it, so it has to be resolved by the caller.
    pub(crate) fn hand_over(&self, pending: PendingLazy) -> Option<PendingLazy> {
        if !self.is_constructing(pending.token.key) {
            return Some(pending);
        }
        match self.nearest_active() {
            Some(frame) => {
                debug!(token = pending.token.name, frame = frame.token.name, "Lazy binding handed over");
                frame.queue.push(pending);
                None
            }
            None => Some(pending),
        }
    }
}

/// Deactivates the frame when construction finishes, including unwinding on error
pub(crate) struct FrameGuard(Arc<Frame>);

impl FrameGuard {
    #[inline]
    #[must_use]
    pub(crate) fn new(frame: Arc<Frame>) -> Self {
        Self(frame)
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        self.0.exit();
    }
}
