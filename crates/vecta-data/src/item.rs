//! Keyed, typed, lazily-serialized items.

use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use vecta_trie::Keyed;

use crate::record::Record;
use crate::value::{infer, Kind, Value};
use crate::vector::Vector;

/// A keyed value unit stored as a trie payload.
///
/// [`value`](Item::value) returns the JSON encoding of the provided value,
/// computed once and reused until the next [`provide`](Item::provide).
/// Nested vectors can change behind a shared reference, so their encoding
/// is never cached.
pub struct Item {
    key: String,
    provided: Value,
    cache: OnceLock<Vec<u8>>,
}

impl Item {
    /// Create an item holding `value` under `key`.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            provided: value.into(),
            cache: OnceLock::new(),
        }
    }

    // -------------------------------------------------------------------
    // Variant constructors
    // -------------------------------------------------------------------

    /// An item holding a string.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    /// An item holding a list of strings.
    pub fn strings<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, Value::Strings(values.into_iter().map(Into::into).collect()))
    }

    /// An item holding a bool.
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    /// An item holding a platform-width signed integer.
    pub fn int(key: impl Into<String>, value: isize) -> Self {
        Self::new(key, Value::Int(value))
    }

    /// An item holding a 64-bit signed integer.
    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Int64(value))
    }

    /// An item holding a platform-width unsigned integer.
    pub fn uint(key: impl Into<String>, value: usize) -> Self {
        Self::new(key, Value::Uint(value))
    }

    /// An item holding a 64-bit unsigned integer.
    pub fn uint64(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::Uint64(value))
    }

    /// An item holding a float.
    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::Float64(value))
    }

    /// An item holding a nested vector.
    pub fn vector(key: impl Into<String>, value: Vector) -> Self {
        Self::new(key, Value::Vector(Box::new(value)))
    }

    /// An item holding JSON that fits no other variant.
    pub fn generic(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(key, Value::Generic(value))
    }

    // -------------------------------------------------------------------
    // Key
    // -------------------------------------------------------------------

    /// The item's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Rename the item. Has no effect on a copy already stored in a trie.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    /// The key with dots removed and each segment capitalised:
    /// `"a.string"` becomes `"AString"`.
    pub fn undotted(&self) -> String {
        self.key
            .split('.')
            .map(|segment| {
                let mut chars = segment.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect()
    }

    // -------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------

    /// Which variant the value is.
    pub fn kind(&self) -> Kind {
        self.provided.kind()
    }

    /// The value as provided, before encoding.
    pub fn provided(&self) -> &Value {
        &self.provided
    }

    /// Replace the value, discarding the cached encoding.
    pub fn provide(&mut self, value: impl Into<Value>) {
        self.provided = value.into();
        self.cache.take();
    }

    /// The JSON encoding of the value.
    pub fn value(&self) -> Cow<'_, [u8]> {
        if let Value::Vector(_) = self.provided {
            return Cow::Owned(self.encode());
        }
        Cow::Borrowed(self.cache.get_or_init(|| self.encode()))
    }

    fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(&self.provided.to_wire()).unwrap_or_default()
    }

    /// The string, if this is a string item.
    pub fn as_str(&self) -> Option<&str> {
        match &self.provided {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The list, if this is a string-list item.
    pub fn as_strings(&self) -> Option<&[String]> {
        match &self.provided {
            Value::Strings(list) => Some(list.as_slice()),
            _ => None,
        }
    }

    /// The bool, if this is a bool item.
    pub fn as_bool(&self) -> Option<bool> {
        match self.provided {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// The integer, if this is an `Int` item.
    pub fn as_int(&self) -> Option<isize> {
        match self.provided {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// The integer, if this is an `Int64` item.
    pub fn as_int64(&self) -> Option<i64> {
        match self.provided {
            Value::Int64(n) => Some(n),
            _ => None,
        }
    }

    /// The integer, if this is a `Uint` item.
    pub fn as_uint(&self) -> Option<usize> {
        match self.provided {
            Value::Uint(n) => Some(n),
            _ => None,
        }
    }

    /// The integer, if this is a `Uint64` item.
    pub fn as_uint64(&self) -> Option<u64> {
        match self.provided {
            Value::Uint64(n) => Some(n),
            _ => None,
        }
    }

    /// The float, if this is a float item.
    pub fn as_float64(&self) -> Option<f64> {
        match self.provided {
            Value::Float64(f) => Some(f),
            _ => None,
        }
    }

    /// The nested vector, if this is a vector item.
    pub fn as_vector(&self) -> Option<&Vector> {
        match &self.provided {
            Value::Vector(v) => Some(&**v),
            _ => None,
        }
    }

    /// The raw JSON, if this is a generic item.
    pub fn as_generic(&self) -> Option<&serde_json::Value> {
        match &self.provided {
            Value::Generic(raw) => Some(raw),
            _ => None,
        }
    }

    /// Replace the value with a string.
    pub fn set_string(&mut self, value: impl Into<String>) {
        self.provide(Value::String(value.into()));
    }

    /// Replace the value with a string list.
    pub fn set_strings<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provide(Value::Strings(values.into_iter().map(Into::into).collect()));
    }

    /// Replace the value with a bool.
    pub fn set_bool(&mut self, value: bool) {
        self.provide(Value::Bool(value));
    }

    /// Replace the value with an `Int`.
    pub fn set_int(&mut self, value: isize) {
        self.provide(Value::Int(value));
    }

    /// Replace the value with an `Int64`.
    pub fn set_int64(&mut self, value: i64) {
        self.provide(Value::Int64(value));
    }

    /// Replace the value with a `Uint`.
    pub fn set_uint(&mut self, value: usize) {
        self.provide(Value::Uint(value));
    }

    /// Replace the value with a `Uint64`.
    pub fn set_uint64(&mut self, value: u64) {
        self.provide(Value::Uint64(value));
    }

    /// Replace the value with a float.
    pub fn set_float64(&mut self, value: f64) {
        self.provide(Value::Float64(value));
    }

    /// Replace the value with a nested vector.
    pub fn set_vector(&mut self, value: Vector) {
        self.provide(Value::Vector(Box::new(value)));
    }

    // -------------------------------------------------------------------
    // Copies and wire form
    // -------------------------------------------------------------------

    /// A copy of this item stored under a different key.
    pub fn clone_as(&self, key: impl Into<String>) -> Self {
        Self::new(key, self.provided.clone())
    }

    /// The wire record for this item.
    pub fn to_record(&self) -> Record {
        Record::new(self.key.clone(), self.provided.to_wire())
    }

    /// Rebuild an item from its wire record, inferring the variant.
    pub fn from_record(record: Record) -> Self {
        Self::new(record.key, infer(record.value))
    }
}

impl Clone for Item {
    /// Same key and value; the copy computes its own encoding.
    fn clone(&self) -> Self {
        Self::new(self.key.clone(), self.provided.clone())
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.provided == other.provided
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("key", &self.key)
            .field("value", &self.provided)
            .finish()
    }
}

impl fmt::Display for Item {
    /// `key:value`, with strings unquoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provided {
            Value::String(s) => write!(f, "{}:{}", self.key, s),
            _ => write!(f, "{}:{}", self.key, String::from_utf8_lossy(&self.value())),
        }
    }
}

impl Keyed for Item {
    fn key_bytes(&self) -> &[u8] {
        self.key.as_bytes()
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Record::deserialize(deserializer).map(Self::from_record)
    }
}
