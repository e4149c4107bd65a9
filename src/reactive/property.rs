// ============================================================================
// ripple-observables - ReactiveProperty
// Scalar wrapper: holds a T, notifies a T
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::observable::Observable;
use crate::reactive::base::Reactive;

struct PropertyInner<T> {
    value: RefCell<T>,
    observable: Observable<T>,
}

/// A single value that notifies on replacement.
///
/// Identity wrapping only: `to_unreactive` hands back a clone of the raw
/// value, and mutating the internals of a cloned-out value does not notify.
/// Interior mutation that *should* notify goes through
/// [`update`](ReactiveProperty::update).
///
/// Cloning the wrapper yields another handle to the same value and channel.
///
/// # Example
///
/// ```
/// use ripple_observables::{observer, property, Reactive};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let number = property(0);
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// number.add_observer(observer({
///     let seen = seen.clone();
///     move |n: &i32| seen.borrow_mut().push(*n)
/// }));
///
/// number.set(1);
/// number.update(|n| *n += 2);
///
/// assert_eq!(number.value(), 3);
/// assert_eq!(*seen.borrow(), vec![1, 3]);
/// ```
pub struct ReactiveProperty<T> {
    inner: Rc<PropertyInner<T>>,
}

impl<T> ReactiveProperty<T> {
    /// Wrap an initial value.
    pub fn new(init: T) -> Self {
        Self {
            inner: Rc::new(PropertyInner {
                value: RefCell::new(init),
                observable: Observable::new(),
            }),
        }
    }

    /// The current value (cloning).
    pub fn value(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.borrow().clone()
    }

    /// Read the current value through a closure, without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Mutate the value in place, then notify once.
    pub fn update(&self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }
}

impl<T: Clone> Reactive for ReactiveProperty<T> {
    type Payload = T;
    type Plain = T;

    fn channel(&self) -> &Observable<T> {
        &self.inner.observable
    }

    fn to_unreactive(&self) -> T {
        self.inner.value.borrow().clone()
    }

    fn set(&self, new_value: T) {
        self.set_without_notifying(new_value);
        self.notify();
    }

    fn set_without_notifying(&self, new_value: T) {
        *self.inner.value.borrow_mut() = new_value;
    }

    fn notify(&self) {
        // Clone out of the cell first so observers may set reentrantly.
        let current = self.inner.value.borrow().clone();
        self.inner.observable.notify(&current);
    }
}

impl<T> Clone for ReactiveProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for ReactiveProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveProperty")
            .field("value", &self.value())
            .finish()
    }
}

/// Create a [`ReactiveProperty`] from an initial value.
pub fn property<T>(init: T) -> ReactiveProperty<T> {
    ReactiveProperty::new(init)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::observable::observer;
    use std::cell::RefCell;

    #[test]
    fn set_replaces_and_notifies_once_per_call() {
        let number = property(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        number.add_observer(observer({
            let seen = seen.clone();
            move |n: &i32| seen.borrow_mut().push(*n)
        }));

        assert_eq!(number.value(), 0);

        number.set(1);
        number.set(2);
        number.update(|n| *n += 1);

        assert_eq!(number.to_unreactive(), 3);
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn set_without_notifying_is_silent() {
        let number = property(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        number.add_observer(observer({
            let seen = seen.clone();
            move |n: &i32| seen.borrow_mut().push(*n)
        }));

        number.set_without_notifying(5);
        assert_eq!(number.value(), 5);
        assert!(seen.borrow().is_empty());

        // A later bare notify sends the silently stored value.
        number.notify();
        assert_eq!(*seen.borrow(), vec![5]);
    }

    #[test]
    fn setting_an_equal_value_still_notifies() {
        let number = property(7);
        let count = Rc::new(RefCell::new(0));
        number.add_observer(observer({
            let count = count.clone();
            move |_: &i32| *count.borrow_mut() += 1
        }));

        number.set(7);
        number.set(7);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn to_unreactive_is_the_raw_value() {
        let text = property(String::from("hello"));
        let plain = text.to_unreactive();
        assert_eq!(plain, "hello");

        // The clone is independent storage.
        let mut plain = plain;
        plain.push('!');
        assert_eq!(text.value(), "hello");
    }

    #[test]
    fn clones_share_value_and_channel() {
        let a = property(1);
        let b = a.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        b.add_observer(observer({
            let seen = seen.clone();
            move |n: &i32| seen.borrow_mut().push(*n)
        }));

        a.set(2);
        assert_eq!(b.value(), 2);
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn filtered_subscription_on_a_property() {
        let number = property(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        number.filter(|n: &i32| *n > 10).add_observer(observer({
            let seen = seen.clone();
            move |n: &i32| seen.borrow_mut().push(*n)
        }));

        number.set(5);
        number.set(15);
        assert_eq!(*seen.borrow(), vec![15]);
    }

    #[test]
    fn reentrant_set_from_an_observer_converges() {
        let number = property(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let clamping = {
            let number = number.clone();
            let seen = seen.clone();
            observer(move |n: &i32| {
                seen.borrow_mut().push(*n);
                if *n > 3 {
                    number.set(3);
                }
            })
        };
        number.add_observer(clamping);

        number.set(5);
        // Depth-first: the clamping write renotifies before `set(5)` returns.
        assert_eq!(*seen.borrow(), vec![5, 3]);
        assert_eq!(number.value(), 3);
    }

    #[test]
    fn debug_format() {
        let number = property(42);
        let debug = format!("{number:?}");
        assert!(debug.contains("ReactiveProperty"));
        assert!(debug.contains("42"));
    }
}
