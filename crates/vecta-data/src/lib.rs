//! Typed items and the `Vector` namespace for the vecta store.
//!
//! An [`Item`] is a keyed value drawn from a closed set of variants
//! ([`Value`]). Items live in a [`Vector`], a read/write-locked namespace over
//! a [`vecta_trie::Trie`] that adds dotted-key conventions, reserved
//! metadata keys and typed accessors.
//!
//! # Key Types
//!
//! - [`Item`] -- key, typed value, lazily cached JSON encoding
//! - [`Value`] / [`Kind`] -- the typed variants and their discriminant
//! - [`Record`] -- wire-neutral `{key, value}` pair
//! - [`Vector`] -- tagged, thread-safe item namespace
//!
//! # Wire Form
//!
//! Every serialization format sees a vector as a sequence of records in key
//! order. Decoding classifies each untyped value with [`infer`]; data that
//! fits no variant is kept as [`Value::Generic`] rather than rejected.

pub mod error;
pub mod item;
pub mod record;
pub mod value;
pub mod vector;

pub use error::{DataError, DataResult};
pub use item::Item;
pub use record::Record;
pub use value::{infer, Kind, Value};
pub use vector::{Vector, ID_KEY, RESERVED_PREFIX, TAG_KEY};
pub use vecta_trie::{TrieOptions, VisitFlow};
