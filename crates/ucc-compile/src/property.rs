//! `PropertySet` for pass communication.
//!
//! Passes publish their results (cancellation reports, op counts) as typed
//! values; callers read them back after the pipeline has run.
//!
//! ```
//! use ucc_compile::PropertySet;
//!
//! #[derive(Debug, PartialEq)]
//! struct Marker(u32);
//!
//! let mut props = PropertySet::new();
//! props.insert(Marker(3));
//! assert_eq!(props.get::<Marker>(), Some(&Marker(3)));
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

/// Typed values shared between compilation passes.
///
/// Each type can have at most one value stored.
#[derive(Debug, Default)]
pub struct PropertySet {
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// Check whether a property of type `T` is present.
    pub fn contains<T: Any>(&self) -> bool {
        self.custom.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Stats(usize);

    #[test]
    fn test_insert_get_remove() {
        let mut props = PropertySet::new();
        assert!(!props.contains::<Stats>());

        props.insert(Stats(4));
        assert_eq!(props.get::<Stats>(), Some(&Stats(4)));

        if let Some(stats) = props.get_mut::<Stats>() {
            stats.0 += 1;
        }
        assert_eq!(props.remove::<Stats>(), Some(Stats(5)));
        assert_eq!(props.get::<Stats>(), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut props = PropertySet::new();
        props.insert(Stats(1));
        props.insert(Stats(2));
        assert_eq!(props.get::<Stats>(), Some(&Stats(2)));
    }
}
