use std::sync::Arc;

use serde_json::Map;

use super::{Collection, Model};
use crate::value::Value;

/// Build a tagged data tree from JSON.
///
/// Objects become [`Model`]s and non-empty arrays of objects become
/// [`Collection`]s. Nested models and collections get their `parent`
/// back-reference pointed at the model holding them, including those sitting
/// in a mixed array. Any other array stays plain.
pub fn import(json: serde_json::Value) -> Value {
    convert(json).to_value()
}

enum Imported {
    Model(Arc<Model>),
    Collection(Arc<Collection>),
    List(Vec<Imported>),
    Plain(Value),
}

impl Imported {
    fn to_value(&self) -> Value {
        match self {
            Imported::Model(model) => Value::Record(model.clone()),
            Imported::Collection(collection) => Value::Collection(collection.clone()),
            Imported::List(items) => Value::Array(items.iter().map(Imported::to_value).collect()),
            Imported::Plain(value) => value.clone(),
        }
    }

    fn adopt(&self, parent: &Value) {
        match self {
            Imported::Model(model) => model.set_parent(parent),
            Imported::Collection(collection) => collection.set_parent(parent),
            // arrays are not scopes; their items belong to the enclosing model
            Imported::List(items) => items.iter().for_each(|item| item.adopt(parent)),
            Imported::Plain(_) => {}
        }
    }
}

fn convert(json: serde_json::Value) -> Imported {
    match json {
        serde_json::Value::Object(map) => Imported::Model(build_model(map)),
        serde_json::Value::Array(items)
            if !items.is_empty() && items.iter().all(serde_json::Value::is_object) =>
        {
            let collection = Collection::new();
            for item in items {
                if let serde_json::Value::Object(map) = item {
                    collection.add(build_model(map));
                }
            }
            Imported::Collection(collection)
        }
        serde_json::Value::Array(items) => Imported::List(items.into_iter().map(convert).collect()),
        other => Imported::Plain(Value::from(other)),
    }
}

fn build_model(map: Map<String, serde_json::Value>) -> Arc<Model> {
    let children: Vec<(String, Imported)> = map.into_iter().map(|(k, v)| (k, convert(v))).collect();
    let model = Model::with_attributes(
        children
            .iter()
            .map(|(name, child)| (name.clone(), child.to_value()))
            .collect(),
    );
    let view = Value::Record(model.clone());
    for (_, child) in &children {
        child.adopt(&view);
    }
    model
}
