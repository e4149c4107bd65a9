// ============================================================================
// ripple-observables - ReactiveObject
// Recursive object wrapper: shape-classified children, bubbling notification
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::core::observable::{Observable, Observer};
use crate::reactive::base::Reactive;
use crate::reactive::value::ReactiveValue;

/// What a [`ReactiveObject`]'s aggregate channel delivers: the current
/// mapping of keys to *live* child wrapper handles, in key insertion order.
pub type ReactiveFields = IndexMap<String, ReactiveValue>;

/// A child wrapper together with the relay observer the parent registered
/// on its aggregate channel. The relay is what gets torn down on deletion.
struct ChildEntry {
    value: ReactiveValue,
    relay: RelayHandle,
}

/// The parent's subscription handle on one child, typed per child kind.
enum RelayHandle {
    Scalar(Observer<Value>),
    Sequence(Observer<Vec<Value>>),
    Fields(Observer<ReactiveFields>),
}

struct ObjectInner {
    fields: RefCell<IndexMap<String, ChildEntry>>,

    /// Aggregate channel: fires the live child mapping after any tracked
    /// change anywhere below this object.
    observable: Observable<ReactiveFields>,

    /// Fires the key that was assigned or added.
    on_set_value_of: Observable<String>,

    /// Fires the removed (now orphaned) child wrapper.
    on_delete: Observable<ReactiveValue>,
}

impl ObjectInner {
    fn notify_aggregate(&self) {
        // Snapshot the handle map first so observers may mutate reentrantly.
        let snapshot: ReactiveFields = {
            let fields = self.fields.borrow();
            fields
                .iter()
                .map(|(key, entry)| (key.clone(), entry.value.clone()))
                .collect()
        };
        self.observable.notify(&snapshot);
    }
}

/// A relay from some channel back into this object's aggregate channel.
/// Weak, so child-to-parent links never form `Rc` cycles.
fn relay<U: 'static>(weak: Weak<ObjectInner>) -> Observer<U> {
    Rc::new(move |_: &U| {
        if let Some(inner) = weak.upgrade() {
            inner.notify_aggregate();
        }
    })
}

/// Subscribe `child`'s aggregate channel to re-fire the parent's, returning
/// the handle needed to tear the link down again.
fn subscribe_child(child: &ReactiveValue, weak: Weak<ObjectInner>) -> RelayHandle {
    match child {
        ReactiveValue::Property(property) => {
            let callback = relay(weak);
            property.channel().add_observer(callback.clone());
            RelayHandle::Scalar(callback)
        }
        ReactiveValue::Array(array) => {
            let callback = relay(weak);
            array.channel().add_observer(callback.clone());
            RelayHandle::Sequence(callback)
        }
        ReactiveValue::Object(object) => {
            let callback = relay(weak);
            object.channel().add_observer(callback.clone());
            RelayHandle::Fields(callback)
        }
    }
}

/// Remove the parent relay from `child`'s aggregate channel.
fn unsubscribe_child(child: &ReactiveValue, handle: &RelayHandle) {
    match (child, handle) {
        (ReactiveValue::Property(property), RelayHandle::Scalar(callback)) => {
            property.channel().remove_observer(callback);
        }
        (ReactiveValue::Array(array), RelayHandle::Sequence(callback)) => {
            array.channel().remove_observer(callback);
        }
        (ReactiveValue::Object(object), RelayHandle::Fields(callback)) => {
            object.channel().remove_observer(callback);
        }
        // Entries are only ever built by subscribe_child, so the pairing
        // always matches.
        _ => {}
    }
}

/// An object whose properties are recursively reactive.
///
/// Every entry of the seed mapping is classified by shape (see
/// [`ReactiveValue`]) and subscribed so that any change below bubbles up to
/// this object's aggregate channel, level by level, to the root. Key
/// assignment and deletion have their own dedicated channels
/// ([`on_set_value_of`](ReactiveObject::on_set_value_of),
/// [`on_delete`](ReactiveObject::on_delete)), which cascade into the
/// aggregate channel as well.
///
/// Cloning the wrapper yields another handle to the same object graph.
///
/// # Example
///
/// ```
/// use ripple_observables::object;
/// use serde_json::json;
///
/// let point = object(json!({ "x": 0, "y": 0 }));
///
/// point.get("x").unwrap().set(json!(1));
/// point.set_value_of("z", json!(2));
///
/// assert_eq!(point.to_value(), json!({ "x": 1, "y": 0, "z": 2 }));
/// ```
pub struct ReactiveObject {
    inner: Rc<ObjectInner>,
}

impl ReactiveObject {
    /// Wrap a seed mapping, recursively.
    pub fn new(seed: Map<String, Value>) -> Self {
        let inner = Rc::new(ObjectInner {
            fields: RefCell::new(IndexMap::new()),
            observable: Observable::new(),
            on_set_value_of: Observable::new(),
            on_delete: Observable::new(),
        });

        // The key-set and key-delete channels cascade into the aggregate
        // channel, exactly like the per-mutator channels of ReactiveArray.
        inner
            .on_set_value_of
            .add_observer(relay(Rc::downgrade(&inner)));
        inner.on_delete.add_observer(relay(Rc::downgrade(&inner)));

        let object = Self { inner };
        for (key, value) in seed {
            object.insert_child(key, value);
        }
        object
    }

    /// Classify, subscribe and store a child without any notification.
    fn insert_child(&self, key: String, value: Value) {
        let child = ReactiveValue::from_value(value);
        let relay = subscribe_child(&child, Rc::downgrade(&self.inner));
        self.inner.fields.borrow_mut().insert(
            key,
            ChildEntry {
                value: child,
                relay,
            },
        );
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// The live child wrapper stored under `key`.
    pub fn get(&self, key: &str) -> Option<ReactiveValue> {
        self.inner
            .fields
            .borrow()
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// The current keys, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.fields.borrow().keys().cloned().collect()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.inner.fields.borrow().len()
    }

    /// Whether the object has no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.fields.borrow().is_empty()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.fields.borrow().contains_key(key)
    }

    /// A snapshot of the key-to-child mapping. The handles are live; the
    /// mapping itself is a copy, so inserting into it changes nothing.
    pub fn value(&self) -> ReactiveFields {
        self.inner
            .fields
            .borrow()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// [`to_unreactive`](Reactive::to_unreactive) packaged as a
    /// [`Value::Object`].
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_unreactive())
    }

    // =========================================================================
    // SUB-CHANNELS
    // =========================================================================

    /// Fires the key assigned or added by
    /// [`set_value_of`](ReactiveObject::set_value_of).
    pub fn on_set_value_of(&self) -> &Observable<String> {
        &self.inner.on_set_value_of
    }

    /// Fires the child wrapper removed by
    /// [`delete`](ReactiveObject::delete). The wrapper stays usable on its
    /// own but no longer reaches this object's observers.
    pub fn on_delete(&self) -> &Observable<ReactiveValue> {
        &self.inner.on_delete
    }

    // =========================================================================
    // KEY OPERATIONS
    // =========================================================================

    /// Assign `new_value` to `key`.
    ///
    /// An existing key keeps its child wrapper: the value is stored silently
    /// and only the key-set channel fires, so the aggregate channel notifies
    /// exactly once however deep the assigned structure is. An absent key
    /// gets a freshly classified child, subscribed for bubbling, then the
    /// key-set channel fires.
    ///
    /// # Panics
    ///
    /// Panics if `key` exists and `new_value`'s shape does not match the
    /// established child shape (see [`ReactiveValue::set_without_notifying`]).
    pub fn set_value_of(&self, key: &str, new_value: Value) {
        let existing = self.get(key);
        match existing {
            Some(child) => child.set_without_notifying(new_value),
            None => self.insert_child(key.to_string(), new_value),
        }
        self.inner.on_set_value_of.notify(&key.to_string());
    }

    /// Remove `key`, returning the orphaned child wrapper.
    ///
    /// The child's bubbling subscription is torn down *before* the
    /// key-delete channel fires, so the orphan can never again trigger this
    /// object's observers. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) -> Option<ReactiveValue> {
        let entry = self.inner.fields.borrow_mut().shift_remove(key)?;
        unsubscribe_child(&entry.value, &entry.relay);
        self.inner.on_delete.notify(&entry.value);
        Some(entry.value)
    }

    /// Replace the whole object with full notification.
    ///
    /// Diffs `new_value` against the current keys: absent keys are
    /// [`delete`](ReactiveObject::delete)d, array and object children
    /// replace with their own notification (recursively for objects),
    /// scalars assign through the property's notifying setter, and added
    /// keys route through [`set_value_of`](ReactiveObject::set_value_of).
    /// A final aggregate notification fires at this level afterwards —
    /// observers see one notification per mutated nested level, plus that
    /// final one, not a single atomic notification.
    ///
    /// # Panics
    ///
    /// Panics on a shape mismatch against an established array or object
    /// child.
    pub fn set_with_notifying_all(&self, new_value: Map<String, Value>) {
        for key in self.keys() {
            match new_value.get(&key) {
                None => {
                    self.delete(&key);
                }
                Some(value) => {
                    if let Some(child) = self.get(&key) {
                        child.set_with_notifying_all(value.clone());
                    }
                }
            }
        }
        for (key, value) in &new_value {
            if !self.contains_key(key) {
                self.set_value_of(key, value.clone());
            }
        }
        self.notify();
    }

    /// The structural diff of
    /// [`set_with_notifying_all`](ReactiveObject::set_with_notifying_all)
    /// with every child operation silent. Silent removal still tears down
    /// the child's bubbling subscription.
    fn apply_silent(&self, new_value: &Map<String, Value>) {
        for key in self.keys() {
            match new_value.get(&key) {
                None => {
                    let removed = self.inner.fields.borrow_mut().shift_remove(&key);
                    if let Some(entry) = removed {
                        unsubscribe_child(&entry.value, &entry.relay);
                    }
                }
                Some(value) => {
                    if let Some(child) = self.get(&key) {
                        child.set_without_notifying(value.clone());
                    }
                }
            }
        }
        for (key, value) in new_value {
            if !self.contains_key(key) {
                self.insert_child(key.clone(), value.clone());
            }
        }
    }
}

impl Reactive for ReactiveObject {
    type Payload = ReactiveFields;
    type Plain = Map<String, Value>;

    fn channel(&self) -> &Observable<ReactiveFields> {
        &self.inner.observable
    }

    /// The plain mapping with every child recursively unwrapped.
    fn to_unreactive(&self) -> Map<String, Value> {
        self.inner
            .fields
            .borrow()
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.to_unreactive()))
            .collect()
    }

    /// Silent structural diff, then exactly one aggregate notification.
    fn set(&self, new_value: Map<String, Value>) {
        self.apply_silent(&new_value);
        self.notify();
    }

    fn set_without_notifying(&self, new_value: Map<String, Value>) {
        self.apply_silent(&new_value);
    }

    fn notify(&self) {
        self.inner.notify_aggregate();
    }
}

impl Clone for ReactiveObject {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for ReactiveObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveObject")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Create a [`ReactiveObject`] from a `serde_json::Value` literal.
///
/// # Panics
///
/// Panics if `init` is not a [`Value::Object`].
pub fn object(init: Value) -> ReactiveObject {
    match init {
        Value::Object(map) => ReactiveObject::new(map),
        other => panic!(
            "ReactiveObject requires an object seed, got a {} value",
            crate::reactive::value::value_kind(&other)
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================
