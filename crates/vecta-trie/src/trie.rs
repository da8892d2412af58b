//! The public trie: lookup, insertion, deletion and ordered walks.

use std::fmt;

use crate::error::TrieResult;
use crate::iter::Iter;
use crate::node::{Node, PutOutcome};
use crate::options::TrieOptions;
use crate::traits::Keyed;
use crate::visit::VisitFlow;

/// A compressed prefix trie mapping byte-string keys to payloads of type `T`.
///
/// The trie holds no locks; wrap it (as `vecta_data::Vector` does) when it
/// must be shared.
#[derive(Clone)]
pub struct Trie<T> {
    root: Node<T>,
    options: TrieOptions,
    len: usize,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Trie<T> {
    /// Create an empty trie with default options.
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            options: TrieOptions::default(),
            len: 0,
        }
    }

    /// Create an empty trie, rejecting non-positive options.
    pub fn with_options(options: TrieOptions) -> TrieResult<Self> {
        options.validate()?;
        Ok(Self {
            root: Node::root(),
            options,
            len: 0,
        })
    }

    /// The options this trie was built with.
    pub fn options(&self) -> &TrieOptions {
        &self.options
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when no payload is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // -------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------

    /// The payload stored at exactly `key`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&T> {
        self.root.get(key.as_ref())
    }

    /// Mutable access to the payload at exactly `key`.
    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut T> {
        self.root.get_mut(key.as_ref())
    }

    /// `true` iff a payload is stored at exactly `key`.
    pub fn matches(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    /// `true` iff some stored key starts with `prefix`.
    pub fn matches_subtree(&self, prefix: impl AsRef<[u8]>) -> bool {
        self.root
            .find_subtree(prefix.as_ref())
            .is_some_and(|(_, node)| node.has_items())
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Store `item` at `key`. An occupied key is only replaced when
    /// `overwrite` is set; otherwise the call returns `false` and the trie
    /// is left untouched.
    pub fn insert_at(&mut self, key: impl AsRef<[u8]>, item: T, overwrite: bool) -> bool {
        match self.root.put(key.as_ref(), item, overwrite, &self.options) {
            PutOutcome::Inserted => {
                self.len += 1;
                true
            }
            PutOutcome::Replaced => true,
            PutOutcome::Rejected => false,
        }
    }

    /// Remove and return the payload at exactly `key`.
    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<T> {
        let removed = self.root.remove(key.as_ref(), &self.options)?;
        self.len -= 1;
        Some(removed)
    }

    /// Remove the payload at exactly `key`, reporting whether one was there.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> bool {
        self.remove(key).is_some()
    }

    /// Drop every payload whose key starts with `prefix`. Returns `false`
    /// when nothing matched.
    pub fn delete_subtree(&mut self, prefix: impl AsRef<[u8]>) -> bool {
        let removed = self.root.remove_subtree(prefix.as_ref(), &self.options);
        self.len -= removed;
        removed > 0
    }

    /// Remove everything.
    pub fn reset(&mut self) {
        self.root = Node::root();
        self.len = 0;
    }

    /// Remove everything except the payloads for which `keep` holds.
    pub fn reset_keeping<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[u8], &T) -> bool,
    {
        let mut drained = Vec::with_capacity(self.len);
        let root = std::mem::replace(&mut self.root, Node::root());
        root.drain_into(&mut Vec::new(), &mut drained);
        self.len = 0;
        for (key, item) in drained {
            if keep(&key, &item) {
                self.insert_at(&key, item, true);
            }
        }
    }

    // -------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------

    /// Walk every payload, pre-order, in ascending key order.
    ///
    /// The callback's [`VisitFlow::Abort`] cause is returned as `Err`.
    pub fn visit<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &T) -> VisitFlow<E>,
    {
        self.root.walk(&mut Vec::new(), &mut f)
    }

    /// Like [`visit`](Self::visit), restricted to keys starting with `prefix`.
    pub fn visit_subtree<E, F>(&self, prefix: impl AsRef<[u8]>, mut f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &T) -> VisitFlow<E>,
    {
        match self.root.find_subtree(prefix.as_ref()) {
            Some((mut path, node)) => node.walk(&mut path, &mut f),
            None => Ok(()),
        }
    }

    /// Visit, shortest first, every payload whose key is a prefix of `key`.
    pub fn visit_prefixes<E, F>(&self, key: impl AsRef<[u8]>, mut f: F) -> Result<(), E>
    where
        F: FnMut(&[u8], &T) -> VisitFlow<E>,
    {
        self.root.walk_prefixes(key.as_ref(), &mut f)
    }

    /// Iterate `(key, payload)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(key, _)| key).collect()
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.root.assert_invariants(true, &self.options);
        assert_eq!(self.root.count_items(), self.len, "len out of sync");
    }
}

impl<T: Keyed> Trie<T> {
    /// Store `item` under its own key. See [`insert_at`](Self::insert_at).
    pub fn put(&mut self, item: T, overwrite: bool) -> bool {
        let key = item.key_bytes().to_vec();
        self.insert_at(key, item, overwrite)
    }
}

impl<'a, T> IntoIterator for &'a Trie<T> {
    type Item = (Vec<u8>, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for Trie<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("len", &self.len)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrieError;

    fn trie_of(keys: &[&str]) -> Trie<String> {
        let mut trie = Trie::new();
        for k in keys {
            assert!(trie.put(k.to_string(), false), "insert {k}");
        }
        trie.assert_invariants();
        trie
    }

    fn collect(trie: &Trie<String>) -> Vec<String> {
        let mut out = Vec::new();
        trie.visit(|_, item| {
            out.push(item.clone());
            VisitFlow::<()>::Continue
        })
        .unwrap();
        out
    }

    // -------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------

    #[test]
    fn rejects_zero_options() {
        let err = Trie::<String>::with_options(TrieOptions::default().max_prefix_per_node(0))
            .unwrap_err();
        assert!(matches!(err, TrieError::InvalidOption { .. }));
        assert!(
            Trie::<String>::with_options(TrieOptions::default().max_children_per_sparse_node(0))
                .is_err()
        );
    }

    #[test]
    fn debug_is_summary() {
        let trie = trie_of(&["a", "b"]);
        let dbg = format!("{trie:?}");
        assert!(dbg.contains("len: 2"));
        assert!(dbg.contains("max_prefix_per_node: 10"));
    }

    // -------------------------------------------------------------------
    // Insert / get
    // -------------------------------------------------------------------

    #[test]
    fn put_then_get() {
        let trie = trie_of(&["Pepa", "Pepa Zdepa", "Pepa Kuchar", "Honza"]);
        assert_eq!(trie.get("Pepa").map(String::as_str), Some("Pepa"));
        assert_eq!(trie.get("Pepa Kuchar").map(String::as_str), Some("Pepa Kuchar"));
        assert!(trie.get("Pep").is_none());
        assert!(trie.get("Pepa K").is_none());
        assert!(trie.get("Nobody").is_none());
        assert_eq!(trie.len(), 4);
    }

    #[test]
    fn put_without_overwrite_keeps_old() {
        let mut trie = Trie::new();
        assert!(trie.insert_at("k", "v1".to_string(), true));
        assert!(!trie.insert_at("k", "v2".to_string(), false));
        assert_eq!(trie.get("k").map(String::as_str), Some("v1"));
        assert!(trie.insert_at("k", "v3".to_string(), true));
        assert_eq!(trie.get("k").map(String::as_str), Some("v3"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn empty_key_lives_on_root() {
        let mut trie = trie_of(&["", "a"]);
        assert_eq!(trie.get("").map(String::as_str), Some(""));
        assert!(trie.delete(""));
        assert!(!trie.matches(""));
        assert!(trie.matches("a"));
        trie.assert_invariants();
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut trie = trie_of(&["tag"]);
        if let Some(item) = trie.get_mut("tag") {
            item.push_str("ged");
        }
        assert_eq!(trie.get("tag").map(String::as_str), Some("tagged"));
    }

    #[test]
    fn many_children_switch_to_dense() {
        let mut trie = Trie::with_options(TrieOptions::default().max_children_per_sparse_node(2))
            .unwrap();
        for c in "abcdefghij".chars() {
            assert!(trie.insert_at(format!("x{c}"), c.to_string(), false));
            trie.assert_invariants();
        }
        for c in "abcdefghij".chars() {
            assert_eq!(trie.get(format!("x{c}")), Some(&c.to_string()));
        }
        for c in "abcdefgh".chars() {
            assert!(trie.delete(format!("x{c}")));
            trie.assert_invariants();
        }
        assert_eq!(trie.keys(), vec![b"xi".to_vec(), b"xj".to_vec()]);
    }

    // -------------------------------------------------------------------
    // Match
    // -------------------------------------------------------------------

    #[test]
    fn match_scenario() {
        let mut trie = Trie::new();
        trie.insert_at("Honza", "C".to_string(), true);
        trie.insert_at("Pepan", "A".to_string(), true);
        trie.insert_at("Pepin", "B".to_string(), true);

        let seen: Vec<String> = trie
            .iter()
            .map(|(k, v)| format!("{}:{v}", String::from_utf8_lossy(&k)))
            .collect();
        assert_eq!(seen, vec!["Honza:C", "Pepan:A", "Pepin:B"]);

        assert!(trie.matches_subtree("Pep"));
        assert!(trie.delete("Pepan"));
        assert!(trie.matches_subtree("Pep"));
        assert!(trie.delete("Pepin"));
        assert!(!trie.matches_subtree("Pep"));
        trie.assert_invariants();
    }

    #[test]
    fn match_subtree_needs_full_prefix() {
        let trie = trie_of(&["A"]);
        assert!(trie.matches_subtree("A"));
        assert!(!trie.matches_subtree("A extra"));
        assert!(trie.matches_subtree(""));
        assert!(!Trie::<String>::new().matches_subtree(""));
    }

    #[test]
    fn match_exact_only() {
        let trie = trie_of(&["Pepan", "Pepin"]);
        assert!(trie.matches("Pepan"));
        assert!(!trie.matches("Pep"));
        assert!(trie.matches_subtree("Pep"));
        assert!(trie.matches_subtree("Pepi"));
    }

    // -------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------

    #[test]
    fn delete_is_idempotent() {
        let mut trie = trie_of(&["Pepan", "Pepin", "Honza"]);
        assert!(trie.delete("Pepan"));
        assert!(!trie.delete("Pepan"));
        assert!(!trie.delete("Pep"));
        assert!(!trie.delete("Nobody"));
        assert_eq!(trie.len(), 2);
        trie.assert_invariants();
    }

    #[test]
    fn delete_restores_compaction() {
        let mut trie = trie_of(&["a", "ab", "abc"]);
        assert!(trie.delete("a"));
        trie.assert_invariants();
        assert!(trie.delete("ab"));
        trie.assert_invariants();
        assert_eq!(trie.get("abc").map(String::as_str), Some("abc"));
    }

    #[test]
    fn insert_after_capped_delete_stays_compacted() {
        let opts = TrieOptions::default().max_prefix_per_node(5);
        for subtree in [false, true] {
            let mut trie = Trie::with_options(opts).unwrap();
            assert!(trie.insert_at("aaaaaa", 6, false));
            assert!(trie.insert_at("ab", 2, false));
            if subtree {
                assert!(trie.delete_subtree("ab"));
            } else {
                assert!(trie.delete("ab"));
            }
            trie.assert_invariants();

            assert!(trie.insert_at("aaa", 3, false));
            trie.assert_invariants();
            assert_eq!(trie.get("aaa"), Some(&3));
            assert_eq!(trie.get("aaaaaa"), Some(&6));
            assert_eq!(trie.keys(), vec![b"aaa".to_vec(), b"aaaaaa".to_vec()]);
        }
    }

    #[test]
    fn remove_returns_payload() {
        let mut trie = trie_of(&["x"]);
        assert_eq!(trie.remove("x").as_deref(), Some("x"));
        assert!(trie.remove("x").is_none());
        assert!(trie.is_empty());
    }

    #[test]
    fn delete_subtree_sequence() {
        let mut trie = trie_of(&[
            "P",
            "Pe",
            "Pep",
            "Pepa",
            "Pepa Zdepa",
            "Pepa Kuchar",
            "Honza",
            "Jenik",
        ]);

        let steps = [
            ("Pe", true),
            ("Pe", false),
            ("Honzik", false),
            ("Honza", true),
            ("Honza", false),
            ("Pep", false),
            ("P", true),
            ("Nobody", false),
            ("", true),
        ];
        for (prefix, expected) in steps {
            assert_eq!(trie.delete_subtree(prefix), expected, "prefix {prefix:?}");
            trie.assert_invariants();
        }
        assert!(trie.is_empty());
    }

    #[test]
    fn delete_subtree_mid_segment() {
        let mut trie = trie_of(&["Pepan", "Pepin", "Honza"]);
        assert!(trie.delete_subtree("Pepi"));
        assert_eq!(trie.keys(), vec![b"Honza".to_vec(), b"Pepan".to_vec()]);
        trie.assert_invariants();
    }

    // -------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------

    #[test]
    fn visit_is_ordered() {
        let trie = trie_of(&["zeta", "alpha", "beta", "al", "", "b"]);
        assert_eq!(collect(&trie), vec!["", "al", "alpha", "b", "beta", "zeta"]);
    }

    #[test]
    fn visit_reports_full_keys() {
        let trie = trie_of(&["Pepan", "Pepin"]);
        let mut keys = Vec::new();
        trie.visit(|key, item| {
            assert_eq!(key, item.as_bytes());
            keys.push(key.to_vec());
            VisitFlow::<()>::Continue
        })
        .unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn visit_skip_subtree() {
        let trie = trie_of(&["a", "ab", "abc", "b", "bc"]);
        let mut seen = Vec::new();
        trie.visit(|_, item| {
            seen.push(item.clone());
            if item == "a" {
                VisitFlow::<()>::SkipSubtree
            } else {
                VisitFlow::Continue
            }
        })
        .unwrap();
        assert_eq!(seen, vec!["a", "b", "bc"]);
    }

    #[test]
    fn visit_abort_propagates_cause() {
        let trie = trie_of(&["a", "b", "c"]);
        let mut seen = 0;
        let result = trie.visit(|_, item| {
            seen += 1;
            if item == "b" {
                VisitFlow::Abort(format!("stopped at {item}"))
            } else {
                VisitFlow::Continue
            }
        });
        assert_eq!(result, Err("stopped at b".to_string()));
        assert_eq!(seen, 2);
    }

    #[test]
    fn visit_subtree_restricts_to_prefix() {
        let trie = trie_of(&[
            "P",
            "Pe",
            "Pep",
            "Pepa",
            "Pepa Zdepa",
            "Pepa Kuchar",
            "Honza",
        ]);
        let mut seen = Vec::new();
        trie.visit_subtree("Pepa ", |key, _| {
            seen.push(String::from_utf8_lossy(key).into_owned());
            VisitFlow::<()>::Continue
        })
        .unwrap();
        assert_eq!(seen, vec!["Pepa Kuchar", "Pepa Zdepa"]);

        let mut count = 0;
        trie.visit_subtree("Pepa", |_, _| {
            count += 1;
            VisitFlow::<()>::Continue
        })
        .unwrap();
        assert_eq!(count, 3);

        let mut none = 0;
        trie.visit_subtree("Pex", |_, _| {
            none += 1;
            VisitFlow::<()>::Continue
        })
        .unwrap();
        assert_eq!(none, 0);
    }

    #[test]
    fn visit_prefixes_root_to_leaf() {
        let trie = trie_of(&["P", "Pe", "Pep", "Pepa", "Pepa Zdepa", "Honza"]);
        let mut seen = Vec::new();
        trie.visit_prefixes("Pepa", |key, _| {
            seen.push(String::from_utf8_lossy(key).into_owned());
            VisitFlow::<()>::Continue
        })
        .unwrap();
        assert_eq!(seen, vec!["P", "Pe", "Pep", "Pepa"]);

        let mut seen = Vec::new();
        trie.visit_prefixes("Pepan", |key, _| {
            seen.push(String::from_utf8_lossy(key).into_owned());
            VisitFlow::<()>::Continue
        })
        .unwrap();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn visit_prefixes_abort() {
        let trie = trie_of(&["a", "ab", "abc"]);
        let result = trie.visit_prefixes("abc", |key, _| {
            if key == b"ab" {
                VisitFlow::Abort(2)
            } else {
                VisitFlow::Continue
            }
        });
        assert_eq!(result, Err(2));
    }

    #[test]
    fn iter_matches_visit() {
        let trie = trie_of(&["Karel", "Karel Hynek Macha", "Karel Capek", "Jan Neruda"]);
        let via_iter: Vec<String> = trie.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(via_iter, collect(&trie));
        for (key, item) in &trie {
            assert_eq!(key, item.as_bytes());
        }
    }

    // -------------------------------------------------------------------
    // Reset
    // -------------------------------------------------------------------

    #[test]
    fn reset_clears() {
        let mut trie = trie_of(&["a", "b"]);
        trie.reset();
        assert!(trie.is_empty());
        assert!(!trie.matches("a"));
        trie.assert_invariants();
    }

    #[test]
    fn reset_keeping_reinserts_matches() {
        let mut trie = trie_of(&["vector.tag", "vector.id", "name", "age"]);
        trie.reset_keeping(|key, _| key.starts_with(b"vector."));
        assert_eq!(trie.len(), 2);
        assert!(trie.matches("vector.tag"));
        assert!(!trie.matches("name"));
        trie.assert_invariants();
    }

    #[test]
    fn clone_is_independent() {
        let mut trie = trie_of(&["a", "b"]);
        let copy = trie.clone();
        trie.delete("a");
        assert!(copy.matches("a"));
        assert_eq!(copy.len(), 2);
    }
}
