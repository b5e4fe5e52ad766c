use serde_json::json;
use std::sync::Arc;
use stencil_core::{
    data::surface, import, is_indexed_collection, is_record, resolve, AccessPolicy, Collection,
    Context, IndexedCollection, Model, PolicyConfig, Record, Value, ViewKind, ACCESS_POLICY,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn todo_collection() -> Arc<Collection> {
    let models = ["write spec", "build", "ship"].into_iter().map(|title| {
        let model = Model::new();
        model.set("title", title);
        model.set("completed", false);
        model
    });
    Collection::from_models(models)
}

#[test]
fn test_allow_listed_record_internals_resolve() {
    init_tracing();
    let model = Model::new();
    model.set_validation_error(Some(Value::from("title must not be empty")));
    let ctx = Context::new(Value::Record(model.clone()));

    for name in stencil_core::policy::RECORD_ALLOW {
        assert!(!ACCESS_POLICY.is_blocked(ViewKind::Record, name));
        assert_eq!(resolve(&ctx, name), model.member(name));
        assert!(resolve(&ctx, name).is_some());
    }
}

#[test]
fn test_scanned_record_internals_are_not_found() {
    init_tracing();
    let model = Model::new();
    model.set("title", "x");
    let ctx = Context::new(Value::Record(model.clone()));

    for name in Model::BASE_SURFACE.iter().flat_map(|layer| layer.iter()) {
        if *name == "validation_error" {
            continue;
        }
        assert!(
            model.member(name).is_some(),
            "{} should exist on the instance",
            name
        );
        assert_eq!(resolve(&ctx, name), None, "{} should be blocked", name);
    }
}

#[test]
fn test_scanned_collection_internals_are_not_found() {
    init_tracing();
    let collection = todo_collection();
    let ctx = Context::new(Value::Collection(collection.clone()));

    for name in Collection::BASE_SURFACE.iter().flat_map(|layer| layer.iter()) {
        if collection.member(name).is_some() {
            assert_eq!(resolve(&ctx, name), None, "{} should be blocked", name);
        }
    }
    assert_eq!(resolve(&ctx, "each"), None);
    assert_eq!(resolve(&ctx, "listen_to"), None);
}

#[test]
fn test_raw_storage_always_not_found() {
    init_tracing();
    let config = PolicyConfig::from_toml_str(
        "[record]\nallow = [\"attributes\"]\n[collection]\nallow = [\"models\"]\n",
    )
    .unwrap();
    let permissive = AccessPolicy::from_config(&config);

    let model = Model::new();
    model.set("title", "x");
    let record_ctx = Context::new(Value::Record(model));
    let collection_ctx = Context::new(Value::Collection(todo_collection()));

    for policy in [&*ACCESS_POLICY, &permissive] {
        assert_eq!(stencil_core::resolve_with(policy, &record_ctx, "attributes"), None);
        assert_eq!(stencil_core::resolve_with(policy, &collection_ctx, "models"), None);
    }
}

#[test]
fn test_presence_beats_truthiness() {
    let model = Model::new();
    model.set("count", 0i64);
    model.set("completed", false);
    model.set("title", "");
    let ctx = Context::new(Value::Record(model));

    assert_eq!(resolve(&ctx, "count"), Some(Value::from(0i64)));
    assert_eq!(resolve(&ctx, "completed"), Some(Value::Bool(false)));
    assert_eq!(resolve(&ctx, "title"), Some(Value::from("")));
}

#[test]
fn test_positional_resolution_on_length_three() {
    let collection = todo_collection();
    collection.set_property("-1", "generic");
    let ctx = Context::new(Value::Collection(collection.clone()));

    assert_eq!(resolve(&ctx, "1"), collection.at(1));
    assert!(resolve(&ctx, "1").is_some());
    assert_eq!(resolve(&ctx, "5"), None);
    // non-canonical names go to generic property resolution
    assert_eq!(resolve(&ctx, "-1"), Some(Value::from("generic")));
    assert_eq!(resolve(&ctx, "1a"), None);
}

#[test]
fn test_automatic_and_explicit_parent() {
    let back_reference = Value::Record(Model::new());
    let model = Model::new();
    model.set_parent(&back_reference);

    let automatic = Context::new(Value::Record(model.clone()));
    assert_eq!(automatic.parent().unwrap().view(), &back_reference);

    let supplied = Context::new(Value::from(json!({ "kind": "supplied" })));
    let explicit = Context::initialize(Some(Value::Record(model)), Some(&supplied));
    assert_eq!(explicit.parent().unwrap().view(), supplied.view());
}

#[test]
fn test_plain_objects_never_consult_block_tables() {
    let mut object = json!({});
    for name in surface::RECORD_METHODS.iter().chain(surface::COLLECTION_METHODS) {
        object[*name] = json!(name);
    }
    object["attributes"] = json!("raw");
    object["models"] = json!("raw");
    let ctx = Context::new(Value::from(object.clone()));

    for (name, value) in object.as_object().unwrap() {
        assert_eq!(resolve(&ctx, name), Some(Value::from(value.clone())));
    }
}

#[test]
fn test_classification_predicates() {
    let root = import(json!({ "items": [{ "a": 1 }], "tags": ["x"] }));
    let record = root.as_record().unwrap();

    assert!(is_record(&root));
    assert!(is_indexed_collection(&record.get("items").unwrap()));
    assert!(is_indexed_collection(&record.get("tags").unwrap()));
    assert!(!is_record(&record.get("tags").unwrap()));
}

#[test]
fn test_template_walk_through_imported_tree() {
    init_tracing();
    let root = import(json!({
        "title": "todos",
        "todo_items": [
            { "title": "write spec", "completed": true },
            { "title": "ship", "completed": false }
        ]
    }));
    let items = root.as_record().unwrap().get("todo_items").unwrap();
    let second = items.as_collection().unwrap().at(1).unwrap();

    let root_ctx = Context::new(root.clone());
    let list_ctx = Context::with_parent(items.clone(), &root_ctx);
    let item_ctx = Context::with_parent(second, &list_ctx);

    assert_eq!(item_ctx.lookup("title"), Some(Value::from("ship")));
    assert_eq!(item_ctx.lookup("completed"), Some(Value::Bool(false)));
    assert_eq!(item_ctx.lookup("todo_items.length"), Some(Value::from(2u64)));
    assert_eq!(item_ctx.lookup("todo_items.0.title"), Some(Value::from("write spec")));
    assert_eq!(item_ctx.lookup("todo_items.models"), None);
    assert_eq!(item_ctx.lookup("save"), None);
}
