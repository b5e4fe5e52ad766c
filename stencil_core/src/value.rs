//! The values a template can observe.
//!
//! `Value` is a closed set of variants. Plain data (`Array`, `Object` and the
//! scalars) is never subject to the access policy; only the framework-tagged
//! `Record` and `Collection` variants are.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use serde_json::Number;

use crate::classify::ViewKind;
use crate::data::{IndexedCollection, Record};

/// A plain, untagged object.
pub type Object = BTreeMap<String, Value>;

/// Reference to a behavioural member of a base surface (e.g. `to_json`).
///
/// Templates can only ever observe it as an opaque, non-null marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub owner: ViewKind,
    pub name: &'static str,
}

impl MethodRef {
    pub fn new(owner: ViewKind, name: &'static str) -> Self {
        Self { owner, name }
    }
}

#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    Record(Arc<dyn Record>),
    Collection(Arc<dyn IndexedCollection>),
    Method(MethodRef),
}

impl Value {
    /// An empty plain object, the view used when none is supplied.
    pub fn empty_object() -> Self {
        Value::Object(Object::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, `false`, zero and the empty string.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The framework tag of this value, if it has one.
    pub fn kind(&self) -> Option<ViewKind> {
        match self {
            Value::Record(_) => Some(ViewKind::Record),
            Value::Collection(_) => Some(ViewKind::Collection),
            _ => None,
        }
    }

    /// Whether generic property access applies to this value at all.
    pub fn is_object_like(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Object(_) | Value::Record(_) | Value::Collection(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Arc<dyn Record>> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Arc<dyn IndexedCollection>> {
        match self {
            Value::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Unfiltered property access over the value's full member surface.
    ///
    /// Returns `None` for values that have no members and for members that
    /// are absent or null. This does not apply any access policy.
    pub fn member(&self, name: &str) -> Option<Value> {
        let value = match self {
            Value::Object(map) => map.get(name).cloned(),
            Value::Array(items) if name == "length" => Some(Value::from(items.len() as u64)),
            Value::Record(record) => record.member(name),
            Value::Collection(collection) => collection.member(name),
            _ => None,
        };
        value.filter(|v| !v.is_null())
    }

    /// The back-reference used for automatic scope discovery.
    ///
    /// `parent` wins over `collection` when both are present.
    pub fn back_reference(&self) -> Option<Value> {
        let found = match self {
            Value::Record(record) => record.parent().or_else(|| record.collection()),
            Value::Collection(collection) => collection.parent(),
            Value::Object(map) => map
                .get("parent")
                .filter(|v| !v.is_falsy())
                .or_else(|| map.get("collection"))
                .cloned(),
            _ => None,
        };
        found.filter(|v| !v.is_falsy())
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Method(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Record(record) => record.to_json(),
            Value::Collection(collection) => collection.to_json(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Framework values compare by identity.
            (Value::Record(a), Value::Record(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Value::Collection(a), Value::Collection(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Value::Method(a), Value::Method(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Method(_) => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            _ => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

/// Plain conversion: JSON objects and arrays stay untagged.
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// A non-owning link from a data value back to the view that contains it.
#[derive(Clone, Debug)]
pub enum WeakView {
    Record(Weak<dyn Record>),
    Collection(Weak<dyn IndexedCollection>),
}

impl WeakView {
    /// Returns `None` for values that cannot be linked (plain data).
    pub fn downgrade(value: &Value) -> Option<Self> {
        match value {
            Value::Record(record) => Some(WeakView::Record(Arc::downgrade(record))),
            Value::Collection(collection) => Some(WeakView::Collection(Arc::downgrade(collection))),
            _ => None,
        }
    }

    pub fn upgrade(&self) -> Option<Value> {
        match self {
            WeakView::Record(weak) => weak.upgrade().map(Value::Record),
            WeakView::Collection(weak) => weak.upgrade().map(Value::Collection),
        }
    }
}
