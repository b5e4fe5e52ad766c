//! Classification of views.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// The framework tag carried by structured values.
///
/// Values without a tag are plain data and never consult the access policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Record,
    Collection,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => write!(f, "record"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

impl std::str::FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "record" | "model" => Ok(Self::Record),
            "collection" => Ok(Self::Collection),
            _ => Err(format!("Invalid view kind: {}", s)),
        }
    }
}

/// True iff `value` is a framework record.
pub fn is_record(value: &Value) -> bool {
    matches!(value, Value::Record(_))
}

/// True iff `value` offers positional access plus a length.
pub fn is_indexed_collection(value: &Value) -> bool {
    matches!(value, Value::Collection(_) | Value::Array(_))
}

/// Positional access for indexed collections; `None` when out of range or
/// when `value` is not indexed at all.
pub fn element_at(value: &Value, index: usize) -> Option<Value> {
    match value {
        Value::Collection(collection) => collection.at(index),
        Value::Array(items) => items.get(index).cloned(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Collection, Model};
    use serde_json::json;

    #[test]
    fn test_classification() {
        let record = Value::Record(Model::new());
        let collection = Value::Collection(Collection::new());
        let array = Value::from(json!([1, 2]));
        let object = Value::from(json!({ "has": true, "get": true }));

        assert!(is_record(&record));
        assert!(!is_indexed_collection(&record));

        assert!(is_indexed_collection(&collection));
        assert!(!is_record(&collection));

        assert!(is_indexed_collection(&array));
        assert!(!is_record(&object));
        assert!(!is_indexed_collection(&object));
        assert!(!is_record(&Value::Null));
        assert!(!is_indexed_collection(&Value::from("abc")));
    }

    #[test]
    fn test_element_at() {
        let array = Value::from(json!(["a", "b"]));
        assert_eq!(element_at(&array, 1), Some(Value::from("b")));
        assert_eq!(element_at(&array, 2), None);
        assert_eq!(element_at(&Value::from(json!({ "0": 1 })), 0), None);
    }

    #[test]
    fn test_view_kind_parse() {
        assert_eq!("record".parse::<ViewKind>(), Ok(ViewKind::Record));
        assert_eq!("Model".parse::<ViewKind>(), Ok(ViewKind::Record));
        assert_eq!("collection".parse::<ViewKind>(), Ok(ViewKind::Collection));
        assert!("widget".parse::<ViewKind>().is_err());
    }
}
