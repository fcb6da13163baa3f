//! Disposable subscription handles
//!
//! A [`Subscription`] is a one-shot token: disposing it runs the stored
//! unsubscribe closure exactly once and drops it. Later calls do nothing.
//! [`SubscriptionGuard`] ties disposal to a scope.

use std::fmt;

/// Handle returned by callback registration.
///
/// Dropping a `Subscription` without disposing it leaves the callback
/// registered; use [`Subscription::scoped`] for drop-based disposal.
#[must_use = "dropping a Subscription keeps the callback registered; call dispose() or scoped()"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A handle with nothing to dispose, returned when a registration is rejected
    pub fn empty() -> Self {
        Self { unsubscribe: None }
    }

    /// True until the handle has been disposed. Always false for empty handles.
    pub fn is_active(&self) -> bool {
        self.unsubscribe.is_some()
    }

    /// Unsubscribe. Only the first call has an effect.
    pub fn dispose(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// Convert into a guard that disposes when it goes out of scope
    pub fn scoped(self) -> SubscriptionGuard {
        SubscriptionGuard { subscription: self }
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Disposes its subscription on every scope exit, including unwinding.
#[must_use = "the subscription is disposed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Subscription,
}

impl SubscriptionGuard {
    /// Dispose now instead of at scope exit
    pub fn dispose(&mut self) {
        self.subscription.dispose();
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }

    /// Give up scoped disposal and hand the subscription back
    pub fn into_inner(mut self) -> Subscription {
        std::mem::take(&mut self.subscription)
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.subscription.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting() -> (Subscription, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        (Subscription::new(move || seen.set(seen.get() + 1)), calls)
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (mut subscription, calls) = counting();
        assert!(subscription.is_active());

        subscription.dispose();
        subscription.dispose();

        assert_eq!(calls.get(), 1);
        assert!(!subscription.is_active());
    }

    #[test]
    fn test_empty_handle() {
        let mut subscription = Subscription::empty();
        assert!(!subscription.is_active());
        subscription.dispose();
    }

    #[test]
    fn test_guard_disposes_on_scope_exit() {
        let (subscription, calls) = counting();
        {
            let _guard = subscription.scoped();
            assert_eq!(calls.get(), 0);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_guard_disposes_once_when_disposed_early() {
        let (subscription, calls) = counting();
        let mut guard = subscription.scoped();
        guard.dispose();
        drop(guard);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_guard_disposes_on_unwind() {
        let (subscription, calls) = counting();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = subscription.scoped();
            panic!("setup failed");
        }));

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_into_inner_keeps_subscription() {
        let (subscription, calls) = counting();
        let mut subscription = subscription.scoped().into_inner();
        assert_eq!(calls.get(), 0);

        subscription.dispose();
        assert_eq!(calls.get(), 1);
    }
}
