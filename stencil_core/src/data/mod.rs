//! The data layer templates read from.
//!
//! `Record` and `IndexedCollection` are the capability sets the resolver
//! relies on. `Model` and `Collection` are the framework's own base types.

mod collection;
mod import;
mod model;
pub mod surface;

pub use collection::Collection;
pub use import::import;
pub use model::Model;

use std::fmt::Debug;

use crate::value::Value;

/// A single structured entity with named fields.
pub trait Record: Debug + Send + Sync {
    /// Presence test for a user-defined field. A field set to a falsy value
    /// is still present.
    fn has(&self, name: &str) -> bool;

    fn get(&self, name: &str) -> Option<Value>;

    /// Generic property access over the record's full member surface,
    /// framework internals included.
    fn member(&self, name: &str) -> Option<Value>;

    fn parent(&self) -> Option<Value> {
        None
    }

    /// The collection that owns this record, if any.
    fn collection(&self) -> Option<Value> {
        None
    }

    fn to_json(&self) -> serde_json::Value;
}

/// An ordered sequence of records addressable by position.
pub trait IndexedCollection: Debug + Send + Sync {
    fn at(&self, index: usize) -> Option<Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generic property access over the collection's full member surface.
    fn member(&self, name: &str) -> Option<Value>;

    fn parent(&self) -> Option<Value> {
        None
    }

    fn to_json(&self) -> serde_json::Value;
}
