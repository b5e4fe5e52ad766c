//! Render scopes.
//!
//! A [`Context`] pairs the value a template is rendering against with the
//! scope it falls back to when a name is not found locally. The engine either
//! hands the enclosing scope in explicitly or lets the context discover it
//! from the view's `parent`/`collection` back-reference.

mod lookup;
mod path;

pub use lookup::{resolve, resolve_with};

use tracing::warn;

use crate::policy::{AccessPolicy, ACCESS_POLICY};
use crate::value::Value;

/// Upper bound on automatically discovered enclosing scopes.
pub const MAX_DISCOVERED_SCOPES: usize = 64;

#[derive(Debug)]
pub struct Context<'a> {
    view: Value,
    parent: Option<Scope<'a>>,
}

#[derive(Debug)]
enum Scope<'a> {
    /// Supplied by the engine; borrowed, never owned.
    Enclosing(&'a Context<'a>),
    /// Built from the view's back-reference.
    Discovered(Box<Context<'a>>),
}

impl<'a> Context<'a> {
    /// Wrap `view` (an empty object when `None` or null). Without an explicit
    /// `parent`, the enclosing scope is discovered from the view's
    /// back-reference; an explicit `parent` always wins.
    pub fn initialize(view: Option<Value>, parent: Option<&'a Context<'a>>) -> Self {
        let view = match view {
            Some(view) if !view.is_null() => view,
            _ => Value::empty_object(),
        };
        let parent = match parent {
            Some(parent) => Some(Scope::Enclosing(parent)),
            None => Self::discover(&view, 0).map(Scope::Discovered),
        };
        Self { view, parent }
    }

    pub fn new(view: impl Into<Value>) -> Self {
        Self::initialize(Some(view.into()), None)
    }

    pub fn with_parent(view: impl Into<Value>, parent: &'a Context<'a>) -> Self {
        Self::initialize(Some(view.into()), Some(parent))
    }

    /// A scope with no enclosing scope and no discovery.
    pub(crate) fn detached(view: Value) -> Self {
        Self { view, parent: None }
    }

    pub fn view(&self) -> &Value {
        &self.view
    }

    pub fn parent(&self) -> Option<&Context<'a>> {
        match self.parent.as_ref()? {
            Scope::Enclosing(parent) => Some(*parent),
            Scope::Discovered(parent) => Some(parent.as_ref()),
        }
    }

    /// This scope followed by each enclosing scope, innermost first.
    pub fn scopes(&self) -> impl Iterator<Item = &Context<'a>> {
        std::iter::successors(Some(self), |ctx| ctx.parent())
    }

    /// Resolve a single name against this scope's view.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        resolve(self, name)
    }

    /// Resolve a dotted/bracket path, walking outward for the first segment.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        self.lookup_with(&ACCESS_POLICY, path)
    }

    pub fn lookup_with(&self, policy: &AccessPolicy, path: &str) -> Option<Value> {
        path::lookup(self, policy, path)
    }

    fn discover(view: &Value, depth: usize) -> Option<Box<Context<'a>>> {
        let back_reference = view.back_reference()?;
        if depth >= MAX_DISCOVERED_SCOPES {
            warn!(depth, "Scope discovery stopped at depth limit");
            return None;
        }
        let parent = Self::discover(&back_reference, depth + 1).map(Scope::Discovered);
        Some(Box::new(Context {
            view: back_reference,
            parent,
        }))
    }
}

impl Default for Context<'_> {
    fn default() -> Self {
        Self::initialize(None, None)
    }
}
