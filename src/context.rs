use std::{
    cell::RefCell,
    future::Future,
    marker::PhantomData,
    pin::Pin,
    task::{Context, Poll},
};

use crate::resolver::Resolver;

thread_local! {
    static INJECTION_CONTEXT: RefCell<Vec<Resolver>> = const { RefCell::new(Vec::new()) };
}

/// Injection context entered for the duration of a factory call.
///
/// Contexts are stacked, so nested constructions restore the outer context when they finish.
/// The guard is bound to the thread that entered it.
pub(crate) struct ContextGuard {
    _not_send: PhantomData<*const ()>,
}

#[must_use]
pub(crate) fn enter(resolver: Resolver) -> ContextGuard {
    INJECTION_CONTEXT.with(|stack| stack.borrow_mut().push(resolver));
    ContextGuard { _not_send: PhantomData }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        INJECTION_CONTEXT.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Resolver of the factory currently running on this thread, if any
#[must_use]
pub fn current_resolver() -> Option<Resolver> {
    INJECTION_CONTEXT.with(|stack| stack.borrow().last().cloned())
}

/// Future that runs an async factory inside its injection context.
///
/// The context is entered on every poll and left before the poll returns,
/// so it never leaks into other tasks polled by the same thread.
pub(crate) struct WithContext<F> {
    resolver: Resolver,
    future: F,
}

impl<F> WithContext<F> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(resolver: Resolver, future: F) -> Self {
        Self { resolver, future }
    }
}

impl<F> Future for WithContext<F>
where
    F: Future + Unpin,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let _guard = enter(this.resolver.clone());
        Pin::new(&mut this.future).poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::{current_resolver, enter, WithContext};
    use crate::Container;

    use std::future::poll_fn;
    use std::task::Poll;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_context_stack() {
        let container = Container::default();

        assert!(current_resolver().is_none());
        {
            let _outer = enter(container.resolver());
            assert!(current_resolver().is_some());
            {
                let _inner = enter(container.resolver());
                assert!(current_resolver().is_some());
            }
            assert!(current_resolver().is_some());
        }
        assert!(current_resolver().is_none());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_with_context() {
        let container = Container::default();

        let mut polls = 0;
        let future = Box::pin(poll_fn(move |cx| {
            assert!(current_resolver().is_some());
            polls += 1;
            if polls < 3 {
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            Poll::Ready(polls)
        }));

        assert_eq!(WithContext::new(container.resolver(), future).await, 3);
        assert!(current_resolver().is_none());
    }
}
