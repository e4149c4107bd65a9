// ============================================================================
// ripple-observables - Reactive Base
// The capability contract shared by every reactive wrapper
// ============================================================================

use crate::core::observable::{FilterObservable, Observable, Observer};

/// The contract every reactive wrapper fulfils.
///
/// A wrapper couples one held value with an aggregate [`Observable`]: its own
/// top-level notification channel, fired whenever any tracked change occurs.
/// `Payload` is what subscribers of that channel receive, `Plain` is the
/// wrapper's value with all reactive wrapping stripped.
///
/// Unlike a bare observable, a wrapper's [`notify`](Reactive::notify) takes
/// no argument: it always sends the wrapper's *current* value.
pub trait Reactive {
    /// What the aggregate channel delivers to observers.
    type Payload;

    /// The plain, unwrapped form of the held value.
    type Plain;

    /// The wrapper's aggregate notification channel.
    ///
    /// Exposed for advanced composition (parents subscribing to children);
    /// everyday subscription goes through the pass-through methods below.
    fn channel(&self) -> &Observable<Self::Payload>;

    /// The held value with all reactive wrapping recursively stripped.
    /// Always structurally equal to the current value, never aliased to the
    /// wrapper's own storage.
    fn to_unreactive(&self) -> Self::Plain;

    /// Replace the held value and notify the aggregate channel exactly once.
    /// Always notifies, whether or not the new value differs from the old.
    fn set(&self, new_value: Self::Plain);

    /// Replace the held value without any notification.
    ///
    /// Meant for bulk replacement by an owning wrapper that notifies once at
    /// its own level afterwards; prefer [`set`](Reactive::set) otherwise.
    fn set_without_notifying(&self, new_value: Self::Plain);

    /// Send the current value to every subscriber of the aggregate channel.
    fn notify(&self);

    /// Subscribe to the aggregate channel unconditionally.
    fn add_observer(&self, callback: Observer<Self::Payload>) {
        self.channel().add_observer(callback);
    }

    /// Unsubscribe by handle identity; unknown handles are a no-op.
    fn remove_observer(&self, callback: &Observer<Self::Payload>) {
        self.channel().remove_observer(callback);
    }

    /// Drop every subscriber of the aggregate channel.
    fn clear_observer(&self) {
        self.channel().clear_observer();
    }

    /// Derive a predicate-filtered view of the aggregate channel.
    fn filter(
        &self,
        predicate: impl Fn(&Self::Payload) -> bool + 'static,
    ) -> FilterObservable<Self::Payload>
    where
        Self: Sized,
    {
        self.channel().filter(predicate)
    }
}
