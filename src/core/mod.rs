// ============================================================================
// ripple-observables - Core Module
// The notification engine everything else is built on
// ============================================================================

pub mod observable;

pub use observable::{observer, FilterObservable, Observable, Observer, Predicate};
