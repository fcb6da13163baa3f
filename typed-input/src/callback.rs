//! Client callbacks and their identity

use crate::types::ActionContext;
use std::fmt;
use std::rc::Rc;

/// A client callback for action events.
///
/// Callbacks are reference counted: clones share the same closure and the same
/// [`CallbackId`]. Register and unregister with clones of one `Callback`.
#[derive(Clone)]
pub struct Callback {
    inner: Rc<dyn Fn(&ActionContext)>,
}

/// Identity of a [`Callback`]: the address of its shared allocation.
///
/// Stable for as long as any clone of the callback is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(usize);

impl Callback {
    pub fn new(f: impl Fn(&ActionContext) + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    /// Identity used to match registrations with unregistrations
    pub fn id(&self) -> CallbackId {
        CallbackId(Rc::as_ptr(&self.inner) as *const () as usize)
    }

    /// Invoke the callback
    pub fn call(&self, context: &ActionContext) {
        (self.inner)(context)
    }
}

impl<F> From<F> for Callback
where
    F: Fn(&ActionContext) + 'static,
{
    fn from(f: F) -> Self {
        Callback::new(f)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_follows_allocation() {
        let a = Callback::new(|_| {});
        let b = Callback::new(|_| {});

        assert_eq!(a.id(), a.clone().id());
        assert_ne!(a.id(), b.id());
    }
}
