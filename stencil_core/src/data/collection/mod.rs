
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use super::model::Model;
use super::surface::{self, COLLECTION_METHODS, COLLECTION_PROPERTIES, EVENT_MEMBERS, ITERATION_HELPERS};
use super::IndexedCollection;
use crate::classify::ViewKind;
use crate::value::{MethodRef, Object, Value, WeakView};

/// The framework's base collection: an ordered sequence of models.
///
/// Models added here get their `collection` back-reference pointed at this
/// collection, which is how a record scope finds its enclosing scope.
#[derive(Debug, Default)]
pub struct Collection {
    // Ordered backing sequence
    models: RwLock<Vec<Arc<Model>>>,
    properties: RwLock<Object>,
    parent: RwLock<Option<WeakView>>,
}

impl Collection {
    /// Every member inherited from the base collection, layer by layer.
    pub const BASE_SURFACE: &'static [&'static [&'static str]] = &[
        EVENT_MEMBERS,
        COLLECTION_METHODS,
        ITERATION_HELPERS,
        COLLECTION_PROPERTIES,
    ];

    /// Name of the field holding the raw backing sequence.
    pub const RAW_STORAGE: &'static str = "models";

    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn from_models<I>(models: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Arc<Model>>,
    {
        let collection = Self::new();
        for model in models {
            collection.add(model);
        }
        collection
    }

    /// Append a model and point its `collection` back-reference here.
    pub fn add(self: &Arc<Self>, model: Arc<Model>) {
        model.attach_to(self);
        self.models.write().push(model);
    }

    /// Get a model by client id
    pub fn get(&self, cid: &Uuid) -> Option<Arc<Model>> {
        self.models.read().iter().find(|m| m.cid() == *cid).cloned()
    }

    /// Remove a model by client id, clearing its back-reference.
    pub fn remove(&self, cid: &Uuid) -> Option<Arc<Model>> {
        let mut models = self.models.write();
        let position = models.iter().position(|m| m.cid() == *cid)?;
        let model = models.remove(position);
        model.detach_from(self);
        Some(model)
    }

    /// All models in order
    pub fn models(&self) -> Vec<Arc<Model>> {
        self.models.read().clone()
    }

    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Models matching the predicate, in order
    pub fn filter<F>(&self, predicate: F) -> Vec<Arc<Model>>
    where
        F: Fn(&Model) -> bool,
    {
        self.models
            .read()
            .iter()
            .filter(|m| predicate(m))
            .cloned()
            .collect()
    }

    pub fn set_property(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.write().insert(name.into(), value.into());
    }

    /// Link this collection to an enclosing view. Plain values clear the link.
    pub fn set_parent(&self, parent: &Value) {
        *self.parent.write() = WeakView::downgrade(parent);
    }

    fn method(name: &str) -> Option<Value> {
        surface::contains(&[EVENT_MEMBERS, COLLECTION_METHODS, ITERATION_HELPERS], name)
            .map(|name| Value::Method(MethodRef::new(ViewKind::Collection, name)))
    }
}

impl IndexedCollection for Collection {
    fn at(&self, index: usize) -> Option<Value> {
        let model = self.models.read().get(index).cloned()?;
        Some(Value::Record(model))
    }

    fn len(&self) -> usize {
        Collection::len(self)
    }

    fn member(&self, name: &str) -> Option<Value> {
        match name {
            Self::RAW_STORAGE => Some(Value::Array(
                self.models().into_iter().map(|m| Value::Record(m)).collect(),
            )),
            "length" => Some(Value::from(Collection::len(self) as u64)),
            "parent" => self.parent(),
            "model" => Some(Value::Method(MethodRef::new(ViewKind::Collection, "model"))),
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

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.models
                .read()
                .iter()
                .map(|m| super::Record::to_json(m.as_ref()))
                .collect(),
        )
    }
}
