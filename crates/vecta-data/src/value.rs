//! The closed set of typed values an [`Item`](crate::Item) can hold, and the
//! classification that recovers them from untyped decoded data.

use std::fmt;

use tracing::warn;

use crate::record::Record;
use crate::vector::Vector;

/// Discriminant of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Strings,
    Bool,
    Int,
    Int64,
    Uint,
    Uint64,
    Float64,
    Vector,
    Generic,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Strings => "strings",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint64 => "uint64",
            Self::Float64 => "float64",
            Self::Vector => "vector",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed payload.
///
/// `Generic` carries data whose type could not be classified; it is kept
/// verbatim rather than rejected.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Strings(Vec<String>),
    Bool(bool),
    Int(isize),
    Int64(i64),
    Uint(usize),
    Uint64(u64),
    Float64(f64),
    Vector(Box<Vector>),
    Generic(serde_json::Value),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::String(_) => Kind::String,
            Self::Strings(_) => Kind::Strings,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Int64(_) => Kind::Int64,
            Self::Uint(_) => Kind::Uint,
            Self::Uint64(_) => Kind::Uint64,
            Self::Float64(_) => Kind::Float64,
            Self::Vector(_) => Kind::Vector,
            Self::Generic(_) => Kind::Generic,
        }
    }

    /// The untyped form written by every serialization format.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_wire(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Self::String(s) => Json::String(s.clone()),
            Self::Strings(list) => Json::Array(list.iter().cloned().map(Json::String).collect()),
            Self::Bool(b) => Json::Bool(*b),
            Self::Int(n) => Json::from(*n as i64),
            Self::Int64(n) => Json::from(*n),
            Self::Uint(n) => Json::from(*n as u64),
            Self::Uint64(n) => Json::from(*n),
            Self::Float64(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Self::Vector(v) => Json::Array(v.to_records().iter().map(Record::to_wire).collect()),
            Self::Generic(raw) => raw.clone(),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Self::Strings(list)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n as isize)
    }
}

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        Self::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int64(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Uint(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Uint64(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float64(f)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Self::Vector(Box::new(v))
    }
}

/// Classify an untyped decoded value into the narrowest typed variant.
///
/// - strings, bools map directly
/// - integers become `Int` when they fit `isize`, then `Int64`, then `Uint64`
/// - whole-valued floats in `i64` range are integers; other floats `Float64`
/// - an empty array or an array of strings becomes `Strings`
/// - an array of `{key, value}` records becomes a nested `Vector`
/// - anything else stays `Generic`
pub fn infer(wire: serde_json::Value) -> Value {
    use serde_json::Value as Json;
    match wire {
        Json::String(s) => Value::String(s),
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                integer(i)
            } else if let Some(u) = n.as_u64() {
                Value::Uint64(u)
            } else {
                match n.as_f64() {
                    Some(f) if is_whole(f) => integer(f as i64),
                    Some(f) => Value::Float64(f),
                    None => generic(Json::Number(n)),
                }
            }
        }
        Json::Array(items) => {
            if items.iter().all(Json::is_string) {
                return Value::Strings(
                    items
                        .into_iter()
                        .filter_map(|s| match s {
                            Json::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                );
            }
            let records: Option<Vec<Record>> = items.iter().map(Record::from_wire).collect();
            match records {
                Some(records) => Value::Vector(Box::new(Vector::from_records(records))),
                None => generic(Json::Array(items)),
            }
        }
        other => generic(other),
    }
}

fn integer(i: i64) -> Value {
    match isize::try_from(i) {
        Ok(n) => Value::Int(n),
        Err(_) => Value::Int64(i),
    }
}

fn is_whole(f: f64) -> bool {
    // 2^63 is the first float past i64::MAX.
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < 9_223_372_036_854_775_808.0
}

fn generic(wire: serde_json::Value) -> Value {
    warn!(kind = wire_kind(&wire), "unclassified value kept as generic");
    Value::Generic(wire)
}

fn wire_kind(wire: &serde_json::Value) -> &'static str {
    match wire {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
