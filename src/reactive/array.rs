// ============================================================================
// ripple-observables - ReactiveArray
// Sequence wrapper: every mutator has its own channel, all cascade into
// the aggregate notify
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::core::observable::{Observable, Observer};
use crate::reactive::base::Reactive;

struct ArrayInner<T> {
    data: RefCell<Vec<T>>,

    /// Aggregate channel: fires the full current sequence after any mutation.
    observable: Observable<Vec<T>>,

    // One dedicated channel per mutating operation family. Each is wired at
    // construction to re-fire the aggregate channel.
    on_set_at: Observable<usize>,
    on_copy_within: Observable<Vec<T>>,
    on_fill: Observable<Vec<T>>,
    on_pop: Observable<Option<T>>,
    on_push: Observable<Vec<T>>,
    on_reverse: Observable<Vec<T>>,
    on_shift: Observable<Option<T>>,
    on_sort: Observable<Vec<T>>,
    on_splice: Observable<Vec<T>>,
    on_unshift: Observable<Vec<T>>,
}

impl<T: Clone> ArrayInner<T> {
    fn notify_aggregate(&self) {
        // Clone out of the cell first so observers may mutate reentrantly.
        let snapshot = self.data.borrow().clone();
        self.observable.notify(&snapshot);
    }
}

/// A relay from a dedicated sub-channel back into the aggregate channel.
/// Weak, so the sub-channel never keeps its own wrapper alive.
fn relay<U: 'static, T: Clone + 'static>(weak: Weak<ArrayInner<T>>) -> Observer<U> {
    Rc::new(move |_: &U| {
        if let Some(inner) = weak.upgrade() {
            inner.notify_aggregate();
        }
    })
}

/// A sequence whose mutating operations notify.
///
/// Mirrors the standard mutating array operations. Each mutator fires its
/// dedicated sub-channel with an operation-specific payload (see the method
/// docs), which in turn fires the aggregate channel with the full
/// post-mutation sequence.
///
/// Cloning the wrapper yields another handle to the same sequence and
/// channels.
///
/// # Example
///
/// ```
/// use ripple_observables::{array, observer, Reactive};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let numbers = array(vec![0, 1, 2]);
/// let aggregate = Rc::new(RefCell::new(Vec::new()));
/// numbers.add_observer(observer({
///     let aggregate = aggregate.clone();
///     move |all: &Vec<i32>| aggregate.borrow_mut().push(all.clone())
/// }));
/// let pushed = Rc::new(RefCell::new(Vec::new()));
/// numbers.on_push().add_observer(observer({
///     let pushed = pushed.clone();
///     move |items: &Vec<i32>| pushed.borrow_mut().push(items.clone())
/// }));
///
/// assert_eq!(numbers.push(vec![3, 4]), 5);
///
/// assert_eq!(*aggregate.borrow(), vec![vec![0, 1, 2, 3, 4]]);
/// assert_eq!(*pushed.borrow(), vec![vec![3, 4]]);
/// ```
pub struct ReactiveArray<T> {
    inner: Rc<ArrayInner<T>>,
}

impl<T: Clone + 'static> ReactiveArray<T> {
    /// Wrap an initial sequence.
    pub fn new(init: Vec<T>) -> Self {
        let inner = Rc::new(ArrayInner {
            data: RefCell::new(init),
            observable: Observable::new(),
            on_set_at: Observable::new(),
            on_copy_within: Observable::new(),
            on_fill: Observable::new(),
            on_pop: Observable::new(),
            on_push: Observable::new(),
            on_reverse: Observable::new(),
            on_shift: Observable::new(),
            on_sort: Observable::new(),
            on_splice: Observable::new(),
            on_unshift: Observable::new(),
        });

        // Every dedicated channel is itself a subscriber of the aggregate
        // channel's trigger: fire any of them and the aggregate fires too.
        inner.on_set_at.add_observer(relay(Rc::downgrade(&inner)));
        inner
            .on_copy_within
            .add_observer(relay(Rc::downgrade(&inner)));
        inner.on_fill.add_observer(relay(Rc::downgrade(&inner)));
        inner.on_pop.add_observer(relay(Rc::downgrade(&inner)));
        inner.on_push.add_observer(relay(Rc::downgrade(&inner)));
        inner.on_reverse.add_observer(relay(Rc::downgrade(&inner)));
        inner.on_shift.add_observer(relay(Rc::downgrade(&inner)));
        inner.on_sort.add_observer(relay(Rc::downgrade(&inner)));
        inner.on_splice.add_observer(relay(Rc::downgrade(&inner)));
        inner.on_unshift.add_observer(relay(Rc::downgrade(&inner)));

        Self { inner }
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// The current sequence (cloned snapshot).
    pub fn value(&self) -> Vec<T> {
        self.inner.data.borrow().clone()
    }

    /// Read the backing sequence through a closure, without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.data.borrow())
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.data.borrow().len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.data.borrow().is_empty()
    }

    // =========================================================================
    // SUB-CHANNELS
    // =========================================================================

    /// Fires the index assigned by [`set_at`](ReactiveArray::set_at).
    pub fn on_set_at(&self) -> &Observable<usize> {
        &self.inner.on_set_at
    }

    /// Fires the full sequence after a `copy_within`.
    pub fn on_copy_within(&self) -> &Observable<Vec<T>> {
        &self.inner.on_copy_within
    }

    /// Fires the full sequence after a `fill`.
    pub fn on_fill(&self) -> &Observable<Vec<T>> {
        &self.inner.on_fill
    }

    /// Fires the popped element, `None` when the sequence was empty.
    pub fn on_pop(&self) -> &Observable<Option<T>> {
        &self.inner.on_pop
    }

    /// Fires the pushed elements only.
    pub fn on_push(&self) -> &Observable<Vec<T>> {
        &self.inner.on_push
    }

    /// Fires the full sequence after a `reverse`.
    pub fn on_reverse(&self) -> &Observable<Vec<T>> {
        &self.inner.on_reverse
    }

    /// Fires the shifted element, `None` when the sequence was empty.
    pub fn on_shift(&self) -> &Observable<Option<T>> {
        &self.inner.on_shift
    }

    /// Fires the full sequence after a `sort`/`sort_by`.
    pub fn on_sort(&self) -> &Observable<Vec<T>> {
        &self.inner.on_sort
    }

    /// Fires the elements removed by a `splice`.
    pub fn on_splice(&self) -> &Observable<Vec<T>> {
        &self.inner.on_splice
    }

    /// Fires the unshifted elements only.
    pub fn on_unshift(&self) -> &Observable<Vec<T>> {
        &self.inner.on_unshift
    }

    // =========================================================================
    // MUTATORS
    // =========================================================================

    /// Assign at `index`, then fire [`on_set_at`](ReactiveArray::on_set_at)
    /// with the index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, per `Vec` indexing semantics.
    pub fn set_at(&self, index: usize, new_value: T) {
        self.inner.data.borrow_mut()[index] = new_value;
        self.inner.on_set_at.notify(&index);
    }

    /// Copy the `start..end` range onto `target` within the sequence, without
    /// changing its length. Indices are clamped to the current length;
    /// `end` defaults to the end of the sequence.
    ///
    /// Fires [`on_copy_within`](ReactiveArray::on_copy_within) with, and
    /// returns, the full sequence after mutation.
    pub fn copy_within(&self, target: usize, start: usize, end: Option<usize>) -> Vec<T> {
        let snapshot = {
            let mut data = self.inner.data.borrow_mut();
            let len = data.len();
            let target = target.min(len);
            let start = start.min(len);
            let end = end.unwrap_or(len).min(len);
            let count = end.saturating_sub(start).min(len - target);

            let source: Vec<T> = data[start..start + count].to_vec();
            for (offset, value) in source.into_iter().enumerate() {
                data[target + offset] = value;
            }
            data.clone()
        };
        self.inner.on_copy_within.notify(&snapshot);
        snapshot
    }

    /// Overwrite the `start..end` range with clones of `value`. Indices are
    /// clamped to the current length; `start` defaults to the beginning,
    /// `end` to the end.
    ///
    /// Fires [`on_fill`](ReactiveArray::on_fill) with, and returns, the full
    /// sequence after mutation.
    pub fn fill(&self, value: T, start: Option<usize>, end: Option<usize>) -> Vec<T> {
        let snapshot = {
            let mut data = self.inner.data.borrow_mut();
            let len = data.len();
            let start = start.unwrap_or(0).min(len);
            let end = end.unwrap_or(len).min(len);
            for slot in &mut data[start..end.max(start)] {
                *slot = value.clone();
            }
            data.clone()
        };
        self.inner.on_fill.notify(&snapshot);
        snapshot
    }

    /// Remove and return the last element. Fires
    /// [`on_pop`](ReactiveArray::on_pop) with the result, even when the
    /// sequence was already empty.
    pub fn pop(&self) -> Option<T> {
        let removed = self.inner.data.borrow_mut().pop();
        self.inner.on_pop.notify(&removed);
        removed
    }

    /// Append `items`, fire [`on_push`](ReactiveArray::on_push) with the
    /// pushed items only, and return the new length.
    pub fn push(&self, items: Vec<T>) -> usize {
        let new_len = {
            let mut data = self.inner.data.borrow_mut();
            data.extend(items.iter().cloned());
            data.len()
        };
        self.inner.on_push.notify(&items);
        new_len
    }

    /// Reverse in place. Fires [`on_reverse`](ReactiveArray::on_reverse)
    /// with, and returns, the full sequence after mutation.
    pub fn reverse(&self) -> Vec<T> {
        let snapshot = {
            let mut data = self.inner.data.borrow_mut();
            data.reverse();
            data.clone()
        };
        self.inner.on_reverse.notify(&snapshot);
        snapshot
    }

    /// Remove and return the first element. Fires
    /// [`on_shift`](ReactiveArray::on_shift) with the result, even when the
    /// sequence was already empty.
    pub fn shift(&self) -> Option<T> {
        let removed = {
            let mut data = self.inner.data.borrow_mut();
            if data.is_empty() {
                None
            } else {
                Some(data.remove(0))
            }
        };
        self.inner.on_shift.notify(&removed);
        removed
    }

    /// Sort in place by `T`'s ordering. Fires
    /// [`on_sort`](ReactiveArray::on_sort) with, and returns, the full
    /// sequence after mutation.
    pub fn sort(&self) -> Vec<T>
    where
        T: Ord,
    {
        self.sort_by(T::cmp)
    }

    /// Sort in place with a comparator. Fires
    /// [`on_sort`](ReactiveArray::on_sort) with, and returns, the full
    /// sequence after mutation.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) -> Vec<T> {
        let snapshot = {
            let mut data = self.inner.data.borrow_mut();
            data.sort_by(compare);
            data.clone()
        };
        self.inner.on_sort.notify(&snapshot);
        snapshot
    }

    /// Remove `delete_count` elements at `start` (clamped; `None` removes
    /// through the end) and insert `items` in their place.
    ///
    /// Fires [`on_splice`](ReactiveArray::on_splice) with, and returns, the
    /// removed elements.
    pub fn splice(&self, start: usize, delete_count: Option<usize>, items: Vec<T>) -> Vec<T> {
        let removed: Vec<T> = {
            let mut data = self.inner.data.borrow_mut();
            let len = data.len();
            let start = start.min(len);
            let delete_count = delete_count.unwrap_or(len - start).min(len - start);
            data.splice(start..start + delete_count, items).collect()
        };
        self.inner.on_splice.notify(&removed);
        removed
    }

    /// Prepend `items`, fire [`on_unshift`](ReactiveArray::on_unshift) with
    /// the prepended items only, and return the new length.
    pub fn unshift(&self, items: Vec<T>) -> usize {
        let new_len = {
            let mut data = self.inner.data.borrow_mut();
            data.splice(0..0, items.iter().cloned());
            data.len()
        };
        self.inner.on_unshift.notify(&items);
        new_len
    }
}

impl<T: Clone + 'static> Reactive for ReactiveArray<T> {
    type Payload = Vec<T>;
    type Plain = Vec<T>;

    fn channel(&self) -> &Observable<Vec<T>> {
        &self.inner.observable
    }

    /// An independent copy of the backing sequence.
    fn to_unreactive(&self) -> Vec<T> {
        self.inner.data.borrow().clone()
    }

    /// Replace the whole sequence and fire the aggregate channel once.
    fn set(&self, new_value: Vec<T>) {
        self.set_without_notifying(new_value);
        self.notify();
    }

    fn set_without_notifying(&self, new_value: Vec<T>) {
        *self.inner.data.borrow_mut() = new_value;
    }

    fn notify(&self) {
        self.inner.notify_aggregate();
    }
}

impl<T> Clone for ReactiveArray<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ReactiveArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveArray")
            .field("data", &*self.inner.data.borrow())
            .finish()
    }
}

/// Create a [`ReactiveArray`] from an initial sequence.
pub fn array<T: Clone + 'static>(init: Vec<T>) -> ReactiveArray<T> {
    ReactiveArray::new(init)
}

// =============================================================================
// TESTS
// =============================================================================
