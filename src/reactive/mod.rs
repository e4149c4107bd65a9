// ============================================================================
// ripple-observables - Reactive Wrappers
// ============================================================================

pub mod base;
pub mod property;
pub mod array;
pub mod value;
pub mod object;

pub use base::Reactive;
pub use property::{property, ReactiveProperty};
pub use array::{array, ReactiveArray};
pub use value::ReactiveValue;
pub use object::{object, ReactiveFields, ReactiveObject};
