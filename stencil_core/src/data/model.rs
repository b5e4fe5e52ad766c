use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use uuid::Uuid;

use super::collection::Collection;
use super::surface::{self, EVENT_MEMBERS, RECORD_METHODS, RECORD_PROPERTIES};
use super::Record;
use crate::classify::ViewKind;
use crate::value::{MethodRef, Object, Value, WeakView};

/// The framework's base record.
///
/// User fields live in the attribute map; everything else reachable through
/// [`Record::member`] is framework surface.
#[derive(Debug)]
pub struct Model {
    cid: Uuid,
    attributes: RwLock<Object>,
    // Attributes touched by the most recent `set`.
    changed: RwLock<Object>,
    validation_error: RwLock<Option<Value>>,
    properties: RwLock<Object>,
    collection: RwLock<Option<Weak<Collection>>>,
    parent: RwLock<Option<WeakView>>,
}

impl Model {
    /// Every member inherited from the base record, layer by layer.
    pub const BASE_SURFACE: &'static [&'static [&'static str]] =
        &[EVENT_MEMBERS, RECORD_METHODS, RECORD_PROPERTIES];

    /// Name of the field holding the raw attribute map.
    pub const RAW_STORAGE: &'static str = "attributes";

    pub fn new() -> Arc<Self> {
        Self::with_attributes(Object::new())
    }

    pub fn with_attributes(attributes: Object) -> Arc<Self> {
        Arc::new(Self {
            cid: Uuid::new_v4(),
            attributes: RwLock::new(attributes),
            changed: RwLock::new(Object::new()),
            validation_error: RwLock::new(None),
            properties: RwLock::new(Object::new()),
            collection: RwLock::new(None),
            parent: RwLock::new(None),
        })
    }

    pub fn cid(&self) -> Uuid {
        self.cid
    }

    /// Set a user field. Returns the previous value, if any.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        let mut changed = self.changed.write();
        changed.clear();
        changed.insert(name.clone(), value.clone());
        self.attributes.write().insert(name, value)
    }

    pub fn unset(&self, name: &str) -> Option<Value> {
        self.attributes.write().remove(name)
    }

    /// Snapshot of the raw attribute map.
    pub fn attributes(&self) -> Object {
        self.attributes.read().clone()
    }

    pub fn validation_error(&self) -> Option<Value> {
        self.validation_error.read().clone()
    }

    pub fn set_validation_error(&self, error: Option<Value>) {
        *self.validation_error.write() = error;
    }

    /// Set an instance property that is not a user field (e.g. an
    /// application helper exposed to templates).
    pub fn set_property(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.write().insert(name.into(), value.into());
    }

    /// Link this model to an enclosing view. Plain values clear the link.
    pub fn set_parent(&self, parent: &Value) {
        *self.parent.write() = WeakView::downgrade(parent);
    }

    pub(super) fn attach_to(&self, collection: &Arc<Collection>) {
        *self.collection.write() = Some(Arc::downgrade(collection));
    }

    pub(super) fn detach_from(&self, collection: &Collection) {
        let mut link = self.collection.write();
        if link
            .as_ref()
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), collection))
        {
            *link = None;
        }
    }

    fn method(name: &str) -> Option<Value> {
        surface::contains(&[EVENT_MEMBERS, RECORD_METHODS], name)
            .map(|name| Value::Method(MethodRef::new(ViewKind::Record, name)))
    }
}

impl Record for Model {
    fn has(&self, name: &str) -> bool {
        self.attributes.read().contains_key(name)
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    fn member(&self, name: &str) -> Option<Value> {
        match name {
            Self::RAW_STORAGE => Some(Value::Object(self.attributes())),
            "cid" => Some(Value::String(self.cid.to_string())),
            "id" => self.get("id"),
            "changed" => Some(Value::Object(self.changed.read().clone())),
            "validation_error" => self.validation_error(),
            "id_attribute" => Some(Value::from("id")),
            "cid_prefix" => Some(Value::from("c")),
            "collection" => self.collection(),
            "parent" => self.parent(),
            _ => self
                .properties
                .read()
                .get(name)
                .cloned()
                .or_else(|| Self::method(name)),
        }
    }

    fn parent(&self) -> Option<Value> {
        self.parent.read().as_ref().and_then(WeakView::upgrade)
    }

    fn collection(&self) -> Option<Value> {
        let collection = self.collection.read().as_ref().and_then(Weak::upgrade)?;
        Some(Value::Collection(collection))
    }

    fn to_json(&self) -> serde_json::Value {
        Value::Object(self.attributes()).to_json()
    }
}
