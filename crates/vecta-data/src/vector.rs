//! `Vector`: a tagged, lock-guarded namespace of items over a trie.

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;
use uuid::Uuid;
use vecta_trie::{Trie, TrieOptions, VisitFlow};

use crate::error::{DataError, DataResult};
use crate::item::Item;
use crate::record::Record;

/// Key of the vector's tag.
pub const TAG_KEY: &str = "vector.tag";

/// Key of the vector's unique id.
pub const ID_KEY: &str = "vector.id";

/// Keys under this prefix survive [`Vector::reset`].
pub const RESERVED_PREFIX: &str = "vector.";

struct Inner {
    trie: Trie<Item>,
    blacklist: BTreeSet<String>,
}

/// A thread-safe, tagged collection of [`Item`]s keyed by dotted strings.
///
/// Every vector carries two reserved items: [`TAG_KEY`] (a caller-chosen
/// label) and [`ID_KEY`] (a UUID assigned at construction). Reads share a
/// read lock; every mutation takes the write lock.
pub struct Vector {
    inner: RwLock<Inner>,
}

impl Vector {
    /// Create a vector tagged `tag`, with default trie options.
    pub fn new(tag: impl Into<String>) -> Self {
        Self::from_trie(tag.into(), Trie::new())
    }

    /// Create a vector tagged `tag` over a trie built with `options`.
    pub fn with_options(tag: impl Into<String>, options: TrieOptions) -> DataResult<Self> {
        let trie = Trie::with_options(options)?;
        Ok(Self::from_trie(tag.into(), trie))
    }

    fn from_trie(tag: String, mut trie: Trie<Item>) -> Self {
        trie.put(Item::string(TAG_KEY, tag), true);
        trie.put(Item::string(ID_KEY, Uuid::now_v7().to_string()), true);
        Self {
            inner: RwLock::new(Inner {
                trie,
                blacklist: BTreeSet::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------

    pub fn tag(&self) -> String {
        self.get_string(TAG_KEY)
    }

    /// Change the tag in place.
    pub fn retag(&self, tag: impl Into<String>) {
        let tag = tag.into();
        let mut inner = self.write();
        match inner.trie.get_mut(TAG_KEY) {
            Some(item) => item.set_string(tag),
            None => {
                inner.trie.put(Item::string(TAG_KEY, tag), true);
            }
        }
    }

    pub fn id(&self) -> String {
        self.get_string(ID_KEY)
    }

    pub fn options(&self) -> TrieOptions {
        *self.read().trie.options()
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<String> {
        self.read()
            .trie
            .iter()
            .map(|(_, item)| item.key().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().trie.len()
    }

    /// Always `false` for a fresh vector: the reserved items count.
    pub fn is_empty(&self) -> bool {
        self.read().trie.is_empty()
    }

    /// A copy of the item stored at `key`.
    pub fn get(&self, key: &str) -> Option<Item> {
        self.read().trie.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().trie.matches(key)
    }

    /// Whether any key starts with `prefix`.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.read().trie.matches_subtree(prefix)
    }

    /// Items whose key contains `needle` anywhere.
    pub fn search(&self, needle: &str) -> Vec<Item> {
        self.read()
            .trie
            .iter()
            .filter(|(_, item)| item.key().contains(needle))
            .map(|(_, item)| item.clone())
            .collect()
    }

    /// Items whose key starts with `prefix`, in key order.
    pub fn subtree(&self, prefix: &str) -> Vec<Item> {
        let mut out = Vec::new();
        let walked: Result<(), Infallible> = self.read().trie.visit_subtree(prefix, |_, item| {
            out.push(item.clone());
            VisitFlow::Continue
        });
        match walked {
            Ok(()) => out,
            Err(never) => match never {},
        }
    }

    /// Items whose key is a prefix of `key`, shortest first.
    pub fn prefixes_of(&self, key: &str) -> Vec<Item> {
        let mut out = Vec::new();
        let walked: Result<(), Infallible> = self.read().trie.visit_prefixes(key, |_, item| {
            out.push(item.clone());
            VisitFlow::Continue
        });
        match walked {
            Ok(()) => out,
            Err(never) => match never {},
        }
    }

    /// Items in key order, minus those whose key is in `except`.
    pub fn list(&self, except: &[&str]) -> Vec<Item> {
        self.read()
            .trie
            .iter()
            .filter(|(_, item)| !except.iter().any(|skip| *skip == item.key()))
            .map(|(_, item)| item.clone())
            .collect()
    }

    /// Walk every item in key order under the read lock.
    ///
    /// The callback must not call back into this vector's mutating methods.
    pub fn visit<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&str, &Item) -> VisitFlow<E>,
    {
        self.read().trie.visit(|_, item| f(item.key(), item))
    }

    /// Undotted key to wire value, for template rendering.
    pub fn template_data(&self) -> BTreeMap<String, serde_json::Value> {
        self.read()
            .trie
            .iter()
            .map(|(_, item)| (item.undotted(), item.provided().to_wire()))
            .collect()
    }

    // -------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------

    /// Keys that [`set`](Self::set) silently refuses from now on.
    pub fn blacklist<I, S>(&self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write()
            .blacklist
            .extend(keys.into_iter().map(Into::into));
    }

    /// Store every item, replacing existing keys. Blacklisted keys are
    /// skipped.
    pub fn set(&self, items: impl IntoIterator<Item = Item>) {
        let mut inner = self.write();
        let mut stored = 0usize;
        for item in items {
            if inner.blacklist.contains(item.key()) {
                debug!(key = item.key(), "skipping blacklisted key");
                continue;
            }
            inner.trie.put(item, true);
            stored += 1;
        }
        debug!(stored, len = inner.trie.len(), "vector set");
    }

    /// Store `item` only if its key is free and not blacklisted.
    pub fn set_if_absent(&self, item: Item) -> bool {
        let mut inner = self.write();
        if inner.blacklist.contains(item.key()) {
            return false;
        }
        inner.trie.put(item, false)
    }

    pub fn remove(&self, key: &str) -> Option<Item> {
        let removed = self.write().trie.remove(key);
        if removed.is_some() {
            debug!(key, "vector remove");
        }
        removed
    }

    /// Drop every item whose key starts with `prefix`.
    pub fn remove_prefix(&self, prefix: &str) -> bool {
        let removed = self.write().trie.delete_subtree(prefix);
        debug!(prefix, removed, "vector remove prefix");
        removed
    }

    /// Copy every non-reserved item of `others` into this vector.
    pub fn merge<'a>(&self, others: impl IntoIterator<Item = &'a Vector>) {
        for other in others {
            let items = other.list(&[TAG_KEY, ID_KEY]);
            self.set(items);
        }
    }

    /// Remove every item, reserved keys included.
    pub fn clear(&self) {
        self.write().trie.reset();
        debug!("vector cleared");
    }

    /// Remove every item except those under [`RESERVED_PREFIX`].
    pub fn reset(&self) {
        self.write()
            .trie
            .reset_keeping(|key, _| key.starts_with(RESERVED_PREFIX.as_bytes()));
        debug!("vector reset");
    }

    // -------------------------------------------------------------------
    // Copies
    // -------------------------------------------------------------------

    /// A new vector with this tag, a fresh id, and copies of every item not
    /// named in `except`.
    pub fn clone_except(&self, except: &[&str]) -> Self {
        let mut skip = except.to_vec();
        skip.extend([TAG_KEY, ID_KEY]);
        let trie = Trie::with_options(self.options()).unwrap_or_default();
        let fresh = Self::from_trie(self.tag(), trie);
        fresh.set(self.list(&skip));
        fresh
    }

    /// [`clone_except`](Self::clone_except), then retag.
    pub fn clone_as(&self, tag: impl Into<String>, except: &[&str]) -> Self {
        let copy = self.clone_except(except);
        copy.retag(tag);
        copy
    }

    // -------------------------------------------------------------------
    // Wire form
    // -------------------------------------------------------------------

    pub fn to_records(&self) -> Vec<Record> {
        self.read()
            .trie
            .iter()
            .map(|(_, item)| item.to_record())
            .collect()
    }

    /// Rebuild a vector from records. Reserved records in the input replace
    /// the generated tag and id.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let vector = Self::new("");
        vector.set(records.into_iter().map(Item::from_record));
        vector
    }

    /// Encode as a JSON record array.
    pub fn to_json(&self, pretty: bool) -> DataResult<Vec<u8>> {
        let records = self.to_records();
        let bytes = if pretty {
            serde_json::to_vec_pretty(&records)?
        } else {
            serde_json::to_vec(&records)?
        };
        Ok(bytes)
    }

    pub fn from_json(bytes: &[u8]) -> DataResult<Self> {
        let records: Vec<Record> = serde_json::from_slice(bytes).map_err(DataError::Json)?;
        Ok(Self::from_records(records))
    }

    // -------------------------------------------------------------------
    // Typed accessors
    // -------------------------------------------------------------------

    fn with_item<R>(&self, key: &str, f: impl FnOnce(&Item) -> Option<R>) -> Option<R> {
        self.read().trie.get(key).and_then(f)
    }

    /// The string at `key`, or `""`.
    pub fn get_string(&self, key: &str) -> String {
        self.with_item(key, |item| item.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// The string list at `key`, or an empty list.
    pub fn get_strings(&self, key: &str) -> Vec<String> {
        self.with_item(key, |item| item.as_strings().map(<[String]>::to_vec))
            .unwrap_or_default()
    }

    /// The bool at `key`, parsed from a string item if need be, or `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.with_item(key, |item| {
            item.as_bool().or_else(|| item.as_str().and_then(parse_bool))
        })
        .unwrap_or_default()
    }

    /// The `Int` at `key`, parsed from a string item if need be, or 0.
    pub fn get_int(&self, key: &str) -> isize {
        self.with_item(key, |item| {
            item.as_int().or_else(|| item.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or_default()
    }

    /// The `Int64` at `key`, parsed from a string item if need be, or 0.
    pub fn get_int64(&self, key: &str) -> i64 {
        self.with_item(key, |item| {
            item.as_int64().or_else(|| item.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or_default()
    }

    /// The `Uint` at `key`, parsed from a string item if need be, or 0.
    pub fn get_uint(&self, key: &str) -> usize {
        self.with_item(key, |item| {
            item.as_uint().or_else(|| item.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or_default()
    }

    /// The `Uint64` at `key`, parsed from a string item if need be, or 0.
    pub fn get_uint64(&self, key: &str) -> u64 {
        self.with_item(key, |item| {
            item.as_uint64().or_else(|| item.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or_default()
    }

    /// The float at `key`, parsed from a string item if need be, or 0.0.
    pub fn get_float64(&self, key: &str) -> f64 {
        self.with_item(key, |item| {
            item.as_float64().or_else(|| item.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or_default()
    }

    /// A copy of the nested vector at `key`.
    pub fn get_vector(&self, key: &str) -> Option<Vector> {
        self.with_item(key, |item| item.as_vector().cloned())
    }

    /// Store a string at `key`.
    pub fn set_string(&self, key: &str, value: impl Into<String>) {
        self.set([Item::string(key, value)]);
    }

    /// Store a string list at `key`.
    pub fn set_strings<I, S>(&self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set([Item::strings(key, values)]);
    }

    /// Store a bool at `key`.
    pub fn set_bool(&self, key: &str, value: bool) {
        self.set([Item::bool(key, value)]);
    }

    /// Store an `Int` at `key`.
    pub fn set_int(&self, key: &str, value: isize) {
        self.set([Item::int(key, value)]);
    }

    /// Store an `Int64` at `key`.
    pub fn set_int64(&self, key: &str, value: i64) {
        self.set([Item::int64(key, value)]);
    }

    /// Store a `Uint` at `key`.
    pub fn set_uint(&self, key: &str, value: usize) {
        self.set([Item::uint(key, value)]);
    }

    /// Store a `Uint64` at `key`.
    pub fn set_uint64(&self, key: &str, value: u64) {
        self.set([Item::uint64(key, value)]);
    }

    /// Store a float at `key`.
    pub fn set_float64(&self, key: &str, value: f64) {
        self.set([Item::float64(key, value)]);
    }

    /// Store a nested vector at `key`.
    pub fn set_vector(&self, key: &str, value: Vector) {
        self.set([Item::vector(key, value)]);
    }
}

/// Accepts `1 t T TRUE true True 0 f F FALSE false False`.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl Clone for Vector {
    /// An exact copy: same tag, same id, same blacklist.
    fn clone(&self) -> Self {
        let inner = self.read();
        Self {
            inner: RwLock::new(Inner {
                trie: inner.trie.clone(),
                blacklist: inner.blacklist.clone(),
            }),
        }
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.list(&[]) == other.list(&[])
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        let tag = inner.trie.get(TAG_KEY).and_then(Item::as_str).unwrap_or_default();
        f.debug_struct("Vector")
            .field("tag", &tag)
            .field("len", &inner.trie.len())
            .finish()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.to_records()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Vector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_records())
    }
}

impl<'de> Deserialize<'de> for Vector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Record>::deserialize(deserializer).map(Self::from_records)
    }
}
