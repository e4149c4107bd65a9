// ============================================================================
// ripple-observables - ReactiveValue
// Shape-classified sum of the three wrapper kinds
// ============================================================================

use serde_json::Value;

use crate::reactive::array::ReactiveArray;
use crate::reactive::base::Reactive;
use crate::reactive::object::ReactiveObject;
use crate::reactive::property::ReactiveProperty;

/// The shape of a plain value, used in diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        _ => "scalar",
    }
}

/// One of the three reactive wrapper kinds, chosen by value shape.
///
/// Classification happens once, at construction or first assignment of a
/// key: arrays become [`ReactiveArray`], objects become a nested
/// [`ReactiveObject`], everything else (including `null`) becomes a
/// [`ReactiveProperty`]. After that the wrapper's shape is fixed; assigning
/// a value of a different shape is a caller error.
///
/// Variants are cheap-clone handles: cloning a `ReactiveValue` aliases the
/// same underlying wrapper.
#[derive(Clone, Debug)]
pub enum ReactiveValue {
    Property(ReactiveProperty<Value>),
    Array(ReactiveArray<Value>),
    Object(ReactiveObject),
}

impl ReactiveValue {
    /// Classify `value` by shape and wrap it.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(ReactiveArray::new(items)),
            Value::Object(map) => Self::Object(ReactiveObject::new(map)),
            scalar => Self::Property(ReactiveProperty::new(scalar)),
        }
    }

    /// The wrapper kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Property(_) => "property",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// The scalar wrapper, if this is one.
    pub fn as_property(&self) -> Option<&ReactiveProperty<Value>> {
        match self {
            Self::Property(property) => Some(property),
            _ => None,
        }
    }

    /// The sequence wrapper, if this is one.
    pub fn as_array(&self) -> Option<&ReactiveArray<Value>> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// The nested object wrapper, if this is one.
    pub fn as_object(&self) -> Option<&ReactiveObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The plain value with all reactive wrapping recursively stripped.
    pub fn to_unreactive(&self) -> Value {
        match self {
            Self::Property(property) => property.to_unreactive(),
            Self::Array(array) => Value::Array(array.to_unreactive()),
            Self::Object(object) => Value::Object(object.to_unreactive()),
        }
    }

    /// Replace the held value, notifying this wrapper's aggregate channel
    /// exactly once.
    ///
    /// # Panics
    ///
    /// Panics if `new_value`'s shape does not match an established array or
    /// object wrapper. A property wrapper accepts any value.
    pub fn set(&self, new_value: Value) {
        match (self, new_value) {
            (Self::Property(property), value) => property.set(value),
            (Self::Array(array), Value::Array(items)) => array.set(items),
            (Self::Object(object), Value::Object(map)) => object.set(map),
            (wrapper, value) => wrapper.shape_panic(&value),
        }
    }

    /// Replace the held value with full notification: nested objects notify
    /// at every mutated level, not just once at this wrapper.
    ///
    /// # Panics
    ///
    /// Panics if `new_value`'s shape does not match an established array or
    /// object wrapper. A property wrapper accepts any value.
    pub fn set_with_notifying_all(&self, new_value: Value) {
        match (self, new_value) {
            (Self::Property(property), value) => property.set(value),
            (Self::Array(array), Value::Array(items)) => array.set(items),
            (Self::Object(object), Value::Object(map)) => object.set_with_notifying_all(map),
            (wrapper, value) => wrapper.shape_panic(&value),
        }
    }

    /// Replace the held value without any notification.
    ///
    /// # Panics
    ///
    /// Panics if `new_value`'s shape does not match an established array or
    /// object wrapper. A property wrapper accepts any value.
    pub fn set_without_notifying(&self, new_value: Value) {
        match (self, new_value) {
            (Self::Property(property), value) => property.set_without_notifying(value),
            (Self::Array(array), Value::Array(items)) => array.set_without_notifying(items),
            (Self::Object(object), Value::Object(map)) => object.set_without_notifying(map),
            (wrapper, value) => wrapper.shape_panic(&value),
        }
    }

    /// Send the wrapper's current value to its aggregate subscribers.
    pub fn notify(&self) {
        match self {
            Self::Property(property) => property.notify(),
            Self::Array(array) => array.notify(),
            Self::Object(object) => object.notify(),
        }
    }

    fn shape_panic(&self, new_value: &Value) -> ! {
        panic!(
            "cannot assign a {} value to an established {} wrapper",
            value_kind(new_value),
            self.kind()
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_become_properties() {
        for seed in [json!(1), json!("text"), json!(true), json!(null)] {
            let wrapped = ReactiveValue::from_value(seed.clone());
            assert!(wrapped.as_property().is_some(), "seed: {seed}");
            assert_eq!(wrapped.to_unreactive(), seed);
        }
    }

    #[test]
    fn sequences_become_arrays() {
        let wrapped = ReactiveValue::from_value(json!([1, 2, 3]));
        let array = wrapped.as_array().expect("array wrapper");
        assert_eq!(array.len(), 3);
        assert_eq!(wrapped.to_unreactive(), json!([1, 2, 3]));
    }

    #[test]
    fn mappings_become_objects_recursively() {
        let wrapped = ReactiveValue::from_value(json!({
            "name": "probe",
            "samples": [1, 2],
            "origin": { "x": 0, "y": 0 }
        }));
        let object = wrapped.as_object().expect("object wrapper");

        assert!(object.get("name").unwrap().as_property().is_some());
        assert!(object.get("samples").unwrap().as_array().is_some());
        assert!(object.get("origin").unwrap().as_object().is_some());
    }

    #[test]
    fn set_follows_the_established_shape() {
        let wrapped = ReactiveValue::from_value(json!([1, 2]));
        wrapped.set(json!([3]));
        assert_eq!(wrapped.to_unreactive(), json!([3]));
    }

    #[test]
    #[should_panic(expected = "established array wrapper")]
    fn shape_mismatch_is_a_precondition_violation() {
        let wrapped = ReactiveValue::from_value(json!([1, 2]));
        wrapped.set(json!(5));
    }

    #[test]
    fn clones_alias_the_same_wrapper() {
        let wrapped = ReactiveValue::from_value(json!(1));
        let alias = wrapped.clone();
        alias.set(json!(2));
        assert_eq!(wrapped.to_unreactive(), json!(2));
    }
}
