//! Member surfaces of the base record and collection types.
//!
//! Each base type's surface is a chain of layers, from the most general mixin
//! to the type's own data properties. The access policy walks every layer, so
//! anything added to a shared layer is picked up by every type built on it.

/// Event wiring shared by records and collections.
pub const EVENT_MEMBERS: &[&str] = &[
    "on",
    "off",
    "trigger",
    "once",
    "listen_to",
    "stop_listening",
    "listen_to_once",
    "bind",
    "unbind",
];

pub const RECORD_METHODS: &[&str] = &[
    "initialize",
    "post_initialize",
    "to_json",
    "sync",
    "get",
    "escape",
    "set",
    "unset",
    "clear",
    "has",
    "matches",
    "has_changed",
    "changed_attributes",
    "previous",
    "previous_attributes",
    "fetch",
    "save",
    "destroy",
    "url",
    "parse",
    "clone",
    "is_new",
    "is_valid",
    "validate",
    "keys",
    "values",
    "pairs",
    "invert",
    "pick",
    "omit",
    "chain",
    "is_empty",
];

/// Data properties declared on the base record itself.
pub const RECORD_PROPERTIES: &[&str] = &["changed", "validation_error", "id_attribute", "cid_prefix"];

pub const COLLECTION_METHODS: &[&str] = &[
    "initialize",
    "post_initialize",
    "to_json",
    "sync",
    "add",
    "remove",
    "set",
    "reset",
    "push",
    "pop",
    "unshift",
    "shift",
    "slice",
    "get",
    "has",
    "at",
    "where",
    "find_where",
    "sort",
    "pluck",
    "fetch",
    "create",
    "parse",
    "clone",
    "model_id",
];

/// Iteration helpers mixed into collections.
pub const ITERATION_HELPERS: &[&str] = &[
    "for_each",
    "each",
    "map",
    "collect",
    "reduce",
    "fold",
    "reduce_right",
    "find",
    "detect",
    "filter",
    "select",
    "reject",
    "every",
    "all",
    "some",
    "any",
    "contains",
    "includes",
    "invoke",
    "max",
    "min",
    "to_array",
    "size",
    "first",
    "head",
    "take",
    "initial",
    "rest",
    "tail",
    "drop",
    "last",
    "without",
    "difference",
    "index_of",
    "last_index_of",
    "shuffle",
    "is_empty",
    "chain",
    "sample",
    "partition",
    "group_by",
    "count_by",
    "sort_by",
    "index_by",
    "find_index",
    "find_last_index",
];

/// Data properties declared on the base collection itself.
pub const COLLECTION_PROPERTIES: &[&str] = &["model", "comparator"];

pub(crate) fn contains(layers: &[&[&'static str]], name: &str) -> Option<&'static str> {
    layers
        .iter()
        .flat_map(|layer| layer.iter())
        .find(|member| **member == name)
        .copied()
}
