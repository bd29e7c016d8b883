//! View models from JSON documents.

use serde_json::Value as Json;

use super::value::{Record, Value};

/// Key holding an object's type tag.
pub const TYPE_KEY: &str = "@type";

/// Convert a JSON document into a bindable value.
///
/// Objects become models whose operations are their keys, arrays become
/// sequences. A string under [`TYPE_KEY`] is the model's type tag.
pub fn from_json(json: Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Flag(b),
        Json::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
        Json::String(s) => Value::Text(s),
        Json::Array(items) => Value::sequence(items.into_iter().map(from_json)),
        Json::Object(map) => {
            let mut record = Record::new();
            for (key, value) in map {
                match (key.as_str(), value) {
                    (TYPE_KEY, Json::String(tag)) => record = record.type_tag(&tag),
                    (_, value) => record = record.field(&key, from_json(value)),
                }
            }
            Value::model(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_scalars() {
        assert!(matches!(from_json(json!(null)), Value::Null));
        assert!(matches!(from_json(json!(true)), Value::Flag(true)));
        assert!(matches!(from_json(json!(1.5)), Value::Number(n) if n == 1.5));
        assert!(matches!(from_json(json!("x")), Value::Text(s) if s == "x"));
    }

    #[test]
    fn test_object_and_type_tag() {
        let value = from_json(json!({"@type": "user", "name": "Jane", "tags": ["a", "b"]}));
        let Value::Model(model) = value else {
            panic!("expected a model");
        };

        assert_eq!(model.type_of().as_deref(), Some("user"));
        assert!(matches!(model.invoke("name", ""), Some(Value::Text(s)) if s == "Jane"));
        assert!(matches!(
            model.invoke("tags", ""),
            Some(Value::Sequence(seq)) if seq.count() == Some(2)
        ));
        assert!(model.invoke("@type", "").is_none());
    }
}
