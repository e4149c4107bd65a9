// ============================================================================
// ripple-observables - An Observer/Reactivity Primitive Library for Rust
// ============================================================================

//! Observable channels and reactive value wrappers.
//!
//! Two layers:
//!
//! - [`Observable`]: a multicast notification channel with chainable
//!   predicate filtering ([`Observable::filter`]).
//! - [`Reactive`] wrappers: [`ReactiveProperty`] for single values,
//!   [`ReactiveArray`] for sequences with per-mutator sub-channels, and
//!   [`ReactiveObject`] for recursively reactive object graphs where
//!   nested changes bubble up to the root.
//!
//! Everything is single-threaded and synchronous: `notify` runs every
//! matching observer on the calling thread before returning. Observers may
//! mutate the very structure that notified them (each notification works on
//! a snapshot), but a mutation performed inside an observer notifies
//! depth-first and nothing bounds the recursion. A panicking observer
//! propagates to the notifier.
//!
//! # Example
//!
//! ```
//! use ripple_observables::{observer, property, Reactive};
//!
//! let temperature = property(20_i32);
//!
//! temperature
//!     .filter(|degrees| *degrees > 30)
//!     .add_observer(observer(|degrees| println!("hot: {degrees}")));
//!
//! temperature.set(25); // filtered out
//! temperature.set(35); // prints "hot: 35"
//! ```

pub mod core;
pub mod reactive;

pub use crate::core::observable::{observer, FilterObservable, Observable, Observer, Predicate};
pub use crate::reactive::array::{array, ReactiveArray};
pub use crate::reactive::base::Reactive;
pub use crate::reactive::object::{object, ReactiveFields, ReactiveObject};
pub use crate::reactive::property::{property, ReactiveProperty};
pub use crate::reactive::value::ReactiveValue;
