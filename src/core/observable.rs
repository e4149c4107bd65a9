// ============================================================================
// ripple-observables - Observable Engine
// Identity-keyed observer registry with chainable predicate filtering
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// OBSERVER AND PREDICATE HANDLES
// =============================================================================

/// A registered callback handle.
///
/// Registration is keyed by the `Rc` allocation, not by the closure's
/// behavior: keep a clone of the handle you registered if you want to remove
/// it later. Wrapping an equivalent closure into a fresh handle produces a
/// *different* identity and will not unsubscribe the original.
pub type Observer<T> = Rc<dyn Fn(&T)>;

/// A boolean filter attached with [`Observable::filter`].
pub type Predicate<T> = Rc<dyn Fn(&T) -> bool>;

/// Wrap a closure into an [`Observer`] handle.
///
/// # Example
///
/// ```
/// use ripple_observables::{observer, Observable};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let numbers: Observable<i32> = Observable::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = observer({
///     let seen = seen.clone();
///     move |n: &i32| seen.borrow_mut().push(*n)
/// });
/// numbers.add_observer(sink.clone());
///
/// numbers.notify(&1);
/// numbers.remove_observer(&sink);
/// numbers.notify(&2);
///
/// assert_eq!(*seen.borrow(), vec![1]);
/// ```
pub fn observer<T>(f: impl Fn(&T) + 'static) -> Observer<T> {
    Rc::new(f)
}

// =============================================================================
// REGISTRY
// =============================================================================

/// One registered observer with its accumulated predicate chain.
/// An empty chain means the observer is unconditional.
struct Entry<T> {
    callback: Observer<T>,
    predicates: Vec<Predicate<T>>,
}

/// The registry shared between an [`Observable`] and every
/// [`FilterObservable`] view derived from it. Insertion order is
/// notification order.
type Registry<T> = Rc<RefCell<Vec<Entry<T>>>>;

/// Pointer identity of an observer handle.
///
/// Cast to a thin pointer so only the allocation address is compared,
/// never the vtable.
fn identity<T>(callback: &Observer<T>) -> *const () {
    Rc::as_ptr(callback) as *const ()
}

/// Insert or replace an entry. Re-registering an existing identity replaces
/// its predicate chain in place and keeps its registry position.
fn register<T>(registry: &Registry<T>, callback: Observer<T>, predicates: Vec<Predicate<T>>) {
    let mut entries = registry.borrow_mut();
    let ptr = identity(&callback);
    if let Some(entry) = entries.iter_mut().find(|e| identity(&e.callback) == ptr) {
        entry.predicates = predicates;
    } else {
        entries.push(Entry {
            callback,
            predicates,
        });
    }
}

// =============================================================================
// OBSERVABLE<T>
// =============================================================================

/// A synchronous notification channel.
///
/// Observers are invoked in registration order; each observer's predicate
/// chain (built with [`filter`](Observable::filter)) is evaluated
/// left-to-right and short-circuits at the first rejection.
///
/// Cloning an `Observable` yields a handle to the *same* registry, so a
/// wrapper can notify the channel its consumers subscribed to.
///
/// Notification is fully synchronous and reentrant: an observer may itself
/// call [`notify`](Observable::notify) or mutate the registry before the
/// outer call returns. An observer that (transitively) re-notifies the
/// channel it is observing recurses without any cycle detection. Observers
/// registered during a fan-out are not invoked until the next one.
///
/// # Example
///
/// ```
/// use ripple_observables::{observer, Observable};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let numbers: Observable<i32> = Observable::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// numbers
///     .filter(|n: &i32| n % 2 == 0)
///     .filter(|n: &i32| *n > 5)
///     .add_observer(observer({
///         let seen = seen.clone();
///         move |n: &i32| seen.borrow_mut().push(*n)
///     }));
///
/// for i in 0..10 {
///     numbers.notify(&i);
/// }
/// assert_eq!(*seen.borrow(), vec![6, 8]);
/// ```
pub struct Observable<T> {
    observers: Registry<T>,
}

impl<T> Observable<T> {
    /// Create a new observable with an empty registry.
    pub fn new() -> Self {
        Self {
            observers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Register `callback` unconditionally.
    ///
    /// Registering a handle that is already present replaces its predicate
    /// chain with the empty (unconditional) chain and keeps its position in
    /// the notification order.
    pub fn add_observer(&self, callback: Observer<T>) {
        register(&self.observers, callback, Vec::new());
    }

    /// Remove the entry whose handle is the exact same allocation as
    /// `callback`. A handle that was never registered is a no-op, not an
    /// error.
    pub fn remove_observer(&self, callback: &Observer<T>) {
        let ptr = identity(callback);
        self.observers
            .borrow_mut()
            .retain(|entry| identity(&entry.callback) != ptr);
    }

    /// Remove every registered observer and its predicate chain.
    pub fn clear_observer(&self) {
        self.observers.borrow_mut().clear();
    }

    /// Derive a filtered view over the same registry.
    ///
    /// The view only exposes [`FilterObservable::filter`] and
    /// [`FilterObservable::add_observer`]; removal, clearing and notifying
    /// stay on the root observable.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> FilterObservable<T> {
        FilterObservable {
            observers: self.observers.clone(),
            predicates: vec![Rc::new(predicate)],
        }
    }

    /// Fan `arg` out to every registered observer whose predicate chain
    /// accepts it.
    ///
    /// The entry list is snapshotted before the fan-out, so observers may
    /// register or remove observers reentrantly without affecting the
    /// current call. If an observer panics, the panic propagates to the
    /// caller and the remaining observers are skipped.
    pub fn notify(&self, arg: &T) {
        // Snapshot entries so the registry borrow is released before any
        // observer runs.
        let entries: Vec<(Observer<T>, Vec<Predicate<T>>)> = self
            .observers
            .borrow()
            .iter()
            .map(|entry| (entry.callback.clone(), entry.predicates.clone()))
            .collect();

        for (callback, predicates) in entries {
            if predicates.iter().all(|predicate| predicate(arg)) {
                callback(arg);
            }
        }
    }

    /// Number of currently registered observers (filtered or not).
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Observable<T> {
    /// Clones share the registry: observers added through one handle are
    /// notified through any other.
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("observers", &self.observer_count())
            .finish()
    }
}

// =============================================================================
// FILTEROBSERVABLE<T> - predicate-chain view
// =============================================================================

/// A filtered view of an [`Observable`].
///
/// Holds a reference to the parent's registry plus the predicate chain
/// accumulated by successive [`filter`](FilterObservable::filter) calls.
/// [`add_observer`](FilterObservable::add_observer) writes into the shared
/// registry with that chain attached, so notifications still originate from
/// the root observable.
pub struct FilterObservable<T> {
    observers: Registry<T>,
    predicates: Vec<Predicate<T>>,
}

impl<T> FilterObservable<T> {
    /// Extend the chain with another predicate. Predicates compose
    /// conjunctively and are evaluated in attachment order.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> FilterObservable<T> {
        let mut predicates = self.predicates.clone();
        predicates.push(Rc::new(predicate));
        FilterObservable {
            observers: self.observers.clone(),
            predicates,
        }
    }

    /// Register `callback` guarded by this view's predicate chain.
    ///
    /// The callback lands in the root observable's registry; removing it
    /// later goes through [`Observable::remove_observer`] with the same
    /// handle.
    pub fn add_observer(&self, callback: Observer<T>) {
        register(&self.observers, callback, self.predicates.clone());
    }
}

impl<T> Clone for FilterObservable<T> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
            predicates: self.predicates.clone(),
        }
    }
}

impl<T> std::fmt::Debug for FilterObservable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterObservable")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
