//! # Stencil Core
//!
//! Context resolution and access control for template rendering.
//!
//! Templates resolve names such as `user.name` or `items.0` against live
//! application data. The data objects also carry framework internals
//! (lifecycle methods, raw storage, event wiring) that templates must never
//! observe. This crate decides, for any view and name, what a template is
//! permitted to see:
//!
//! 1. **Classification**: records, indexed collections, plain values.
//! 2. **Access policy**: default-deny tables of blocked internal member
//!    names, built once per process.
//! 3. **Context**: a render scope with an optional enclosing scope,
//!    discovered automatically from back-references.
//! 4. **Lookup**: the resolution order that reads user data freely and
//!    polices generic member access.

pub mod classify;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod policy;
pub mod value;

pub use classify::{is_indexed_collection, is_record, ViewKind};
pub use config::{KindRules, PolicyConfig};
pub use context::{resolve, resolve_with, Context};
pub use data::{import, Collection, IndexedCollection, Model, Record};
pub use error::{ContextError, Result};
pub use policy::{AccessPolicy, ACCESS_POLICY};
pub use value::{MethodRef, Object, Value, WeakView};
