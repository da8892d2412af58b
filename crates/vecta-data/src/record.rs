//! Wire-neutral key/value records.

use serde::{Deserialize, Serialize};

/// One `{key, value}` pair as it travels through a serialization format.
///
/// The value is untyped; [`Item::from_record`](crate::Item::from_record)
/// recovers the typed variant through inference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: String,
    pub value: serde_json::Value,
}

impl Record {
    pub fn new(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Read a record back out of its untyped object form.
    ///
    /// Only an object with exactly a string `key` and a `value` qualifies.
    pub fn from_wire(wire: &serde_json::Value) -> Option<Self> {
        let object = wire.as_object()?;
        if object.len() != 2 {
            return None;
        }
        let key = object.get("key")?.as_str()?;
        let value = object.get("value")?;
        Some(Self::new(key, value.clone()))
    }

    /// The untyped object form of this record.
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({ "key": self.key, "value": self.value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape_is_recognised() {
        let record = Record::from_wire(&json!({"key": "a.b", "value": [1, 2]})).unwrap();
        assert_eq!(record.key, "a.b");
        assert_eq!(record.value, json!([1, 2]));
        assert_eq!(record.to_wire(), json!({"key": "a.b", "value": [1, 2]}));
    }

    #[test]
    fn other_shapes_are_not_records() {
        assert!(Record::from_wire(&json!("a")).is_none());
        assert!(Record::from_wire(&json!({"key": "a"})).is_none());
        assert!(Record::from_wire(&json!({"key": 1, "value": 2})).is_none());
        assert!(Record::from_wire(&json!({"key": "a", "value": 2, "extra": 3})).is_none());
        assert!(Record::from_wire(&json!({"name": "a", "value": 2})).is_none());
    }

    #[test]
    fn serde_field_names() {
        let record = Record::new("x", json!(true));
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(text, r#"{"key":"x","value":true}"#);
    }
}
