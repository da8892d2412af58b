//! Trie nodes and the recursive split/merge machinery.
//!
//! All key arguments below are *remainders*: the part of the key left after
//! the receiving node's own prefix has been matched.

use std::mem;

use tracing::trace;

use crate::children::Children;
use crate::options::TrieOptions;
use crate::visit::VisitFlow;

/// One trie node: a prefix segment, its outgoing edges and an optional
/// payload. A node without a payload is a pure branch point.
#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) prefix: Vec<u8>,
    pub(crate) item: Option<T>,
    pub(crate) children: Children<T>,
}

/// Result of a single insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PutOutcome {
    Inserted,
    Replaced,
    Rejected,
}

/// Length of the longest common prefix of `a` and `b`.
pub(crate) fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<T> Node<T> {
    pub(crate) fn new(prefix: Vec<u8>, item: Option<T>) -> Self {
        Self {
            prefix,
            item,
            children: Children::new(),
        }
    }

    /// The root node: empty prefix, no payload.
    pub(crate) fn root() -> Self {
        Self::new(Vec::new(), None)
    }

    /// Whether any payload lives at or below this node.
    pub(crate) fn has_items(&self) -> bool {
        self.item.is_some() || !self.children.is_empty()
    }

    /// Number of payloads at or below this node.
    pub(crate) fn count_items(&self) -> usize {
        let below: usize = self
            .children
            .ordered()
            .map(|(_, child)| child.count_items())
            .sum();
        below + usize::from(self.item.is_some())
    }

    // ---------------------------------------------------------------
    // Insert
    // ---------------------------------------------------------------

    /// Store `item` at `key` below this node.
    pub(crate) fn put(
        &mut self,
        key: &[u8],
        item: T,
        overwrite: bool,
        opts: &TrieOptions,
    ) -> PutOutcome {
        let Some(&byte) = key.first() else {
            return match self.item {
                Some(_) if !overwrite => PutOutcome::Rejected,
                Some(_) => {
                    self.item = Some(item);
                    PutOutcome::Replaced
                }
                None => {
                    self.item = Some(item);
                    PutOutcome::Inserted
                }
            };
        };

        match self.children.get_mut(byte) {
            Some(child) => {
                let common = common_prefix_len(&child.prefix, key);
                if common < child.prefix.len() {
                    child.split(common, opts);
                }
                let outcome = child.put(&key[common..], item, overwrite, opts);
                // A split further down can shorten the only child of a
                // branch that was left unmerged at the prefix cap.
                if child.item.is_none() && child.children.len() == 1 {
                    child.absorb_only_child(opts.max_prefix_per_node);
                }
                outcome
            }
            None => {
                let chain = Self::chain(key, item, opts);
                self.children
                    .insert(byte, chain, opts.max_children_per_sparse_node);
                PutOutcome::Inserted
            }
        }
    }

    /// Build the node (or chain of nodes, each no longer than the prefix
    /// cap) that spells `key` and holds `item` at its end.
    fn chain(key: &[u8], item: T, opts: &TrieOptions) -> Box<Self> {
        let max = opts.max_prefix_per_node;
        let mut start = (key.len().saturating_sub(1) / max) * max;
        let mut node = Box::new(Self::new(key[start..].to_vec(), Some(item)));
        while start > 0 {
            let upper = start - max;
            let mut link = Self::new(key[upper..start].to_vec(), None);
            link.children
                .insert(key[start], node, opts.max_children_per_sparse_node);
            node = Box::new(link);
            start = upper;
        }
        node
    }

    /// Keep the first `at` bytes of the prefix here and push everything
    /// else (suffix, payload, children) down into a new child.
    fn split(&mut self, at: usize, opts: &TrieOptions) {
        let suffix = self.prefix.split_off(at);
        let byte = suffix[0];
        trace!(kept = at, moved = suffix.len(), "splitting node");
        let mut lower = Self {
            prefix: suffix,
            item: self.item.take(),
            children: mem::take(&mut self.children),
        };
        // A capped chain link that got shorter may now fit its successor.
        if lower.item.is_none() && lower.children.len() == 1 {
            lower.absorb_only_child(opts.max_prefix_per_node);
        }
        self.children
            .insert(byte, Box::new(lower), opts.max_children_per_sparse_node);
    }

    // ---------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------

    pub(crate) fn get(&self, key: &[u8]) -> Option<&T> {
        let mut node = self;
        let mut rest = key;
        while let Some(&byte) = rest.first() {
            let child = node.children.get(byte)?;
            rest = rest.strip_prefix(child.prefix.as_slice())?;
            node = child;
        }
        node.item.as_ref()
    }

    pub(crate) fn get_mut(&mut self, key: &[u8]) -> Option<&mut T> {
        let mut node = self;
        let mut rest = key;
        while let Some(&byte) = rest.first() {
            let child = node.children.get_mut(byte)?;
            rest = rest.strip_prefix(child.prefix.as_slice())?;
            node = child;
        }
        node.item.as_mut()
    }

    /// Locate the node whose full path is the shortest one starting with
    /// `prefix`. `prefix` may end part-way through that node's own segment.
    ///
    /// Returns the path of the node's parent alongside the node.
    pub(crate) fn find_subtree(&self, prefix: &[u8]) -> Option<(Vec<u8>, &Self)> {
        let mut node = self;
        let mut path = self.prefix.clone();
        let mut rest = prefix;
        loop {
            let Some(&byte) = rest.first() else {
                return Some((Vec::new(), node));
            };
            let child = node.children.get(byte)?;
            if rest.len() <= child.prefix.len() {
                return child.prefix.starts_with(rest).then_some((path, child));
            }
            rest = rest.strip_prefix(child.prefix.as_slice())?;
            path.extend_from_slice(&child.prefix);
            node = child;
        }
    }

    // ---------------------------------------------------------------
    // Delete
    // ---------------------------------------------------------------

    /// Remove the payload at exactly `key`, compacting on the way back up.
    pub(crate) fn remove(&mut self, key: &[u8], opts: &TrieOptions) -> Option<T> {
        let Some(&byte) = key.first() else {
            return self.item.take();
        };
        let child = self.children.get_mut(byte)?;
        let rest = key.strip_prefix(child.prefix.as_slice())?;
        let removed = child.remove(rest, opts)?;
        self.repair_child(byte, opts);
        Some(removed)
    }

    /// Detach the whole subtree under `prefix`, returning how many payloads
    /// went with it.
    pub(crate) fn remove_subtree(&mut self, prefix: &[u8], opts: &TrieOptions) -> usize {
        let Some(&byte) = prefix.first() else {
            let count = self.count_items();
            self.item = None;
            self.children = Children::new();
            return count;
        };
        let Some(child) = self.children.get_mut(byte) else {
            return 0;
        };
        if prefix.len() <= child.prefix.len() {
            if !child.prefix.starts_with(prefix) {
                return 0;
            }
            return self
                .children
                .remove(byte, opts.max_children_per_sparse_node)
                .map_or(0, |detached| detached.count_items());
        }
        let Some(rest) = prefix.strip_prefix(child.prefix.as_slice()) else {
            return 0;
        };
        let removed = child.remove_subtree(rest, opts);
        if removed > 0 {
            self.repair_child(byte, opts);
        }
        removed
    }

    /// Restore the compaction invariant for the child under `byte` after
    /// something below it was removed.
    fn repair_child(&mut self, byte: u8, opts: &TrieOptions) {
        let Some(child) = self.children.get_mut(byte) else {
            return;
        };
        if child.item.is_some() {
            return;
        }
        match child.children.len() {
            0 => {
                self.children
                    .remove(byte, opts.max_children_per_sparse_node);
            }
            1 => child.absorb_only_child(opts.max_prefix_per_node),
            _ => {}
        }
    }

    /// Merge a payload-less node with its only child. Skipped when the
    /// combined prefix would exceed `max_prefix`.
    fn absorb_only_child(&mut self, max_prefix: usize) {
        let fits = self
            .children
            .only()
            .is_some_and(|only| self.prefix.len() + only.prefix.len() <= max_prefix);
        if !fits {
            return;
        }
        let Some(only) = self.children.take_only() else {
            return;
        };
        let Self {
            prefix,
            item,
            children,
        } = *only;
        trace!(
            upper = self.prefix.len(),
            lower = prefix.len(),
            "compacting single-child node"
        );
        self.prefix.extend_from_slice(&prefix);
        self.item = item;
        self.children = children;
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    /// Pre-order, ascending-byte walk over every payload at or below this
    /// node. `path` holds the key of this node's parent on entry and is
    /// restored on exit.
    pub(crate) fn walk<E, F>(&self, path: &mut Vec<u8>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&[u8], &T) -> VisitFlow<E>,
    {
        let base = path.len();
        path.extend_from_slice(&self.prefix);
        let result = self.walk_here(path, f);
        path.truncate(base);
        result
    }

    fn walk_here<E, F>(&self, path: &mut Vec<u8>, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&[u8], &T) -> VisitFlow<E>,
    {
        if let Some(item) = &self.item {
            match f(path, item) {
                VisitFlow::Continue => {}
                VisitFlow::SkipSubtree => return Ok(()),
                VisitFlow::Abort(e) => return Err(e),
            }
        }
        for (_, child) in self.children.ordered() {
            child.walk(path, f)?;
        }
        Ok(())
    }

    /// Visit, root first, every payload whose key is a prefix of `key`.
    pub(crate) fn walk_prefixes<E, F>(&self, key: &[u8], f: &mut F) -> Result<(), E>
    where
        F: FnMut(&[u8], &T) -> VisitFlow<E>,
    {
        let mut node = self;
        let mut path = self.prefix.clone();
        let mut rest = key;
        loop {
            if let Some(item) = &node.item {
                match f(&path, item) {
                    VisitFlow::Continue => {}
                    VisitFlow::SkipSubtree => return Ok(()),
                    VisitFlow::Abort(e) => return Err(e),
                }
            }
            let Some(&byte) = rest.first() else {
                return Ok(());
            };
            let Some(child) = node.children.get(byte) else {
                return Ok(());
            };
            let Some(next) = rest.strip_prefix(child.prefix.as_slice()) else {
                return Ok(());
            };
            path.extend_from_slice(&child.prefix);
            rest = next;
            node = child;
        }
    }

    /// Consume the subtree, appending `(key, payload)` pairs in key order.
    pub(crate) fn drain_into(self, path: &mut Vec<u8>, out: &mut Vec<(Vec<u8>, T)>) {
        let base = path.len();
        path.extend_from_slice(&self.prefix);
        if let Some(item) = self.item {
            out.push((path.clone(), item));
        }
        for child in self.children.into_ordered() {
            child.drain_into(path, out);
        }
        path.truncate(base);
    }

    /// Panic if the subtree breaks a structural invariant.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, is_root: bool, opts: &TrieOptions) {
        if is_root {
            assert!(self.prefix.is_empty(), "root prefix must be empty");
        } else {
            assert!(!self.prefix.is_empty(), "non-root prefix must not be empty");
            assert!(
                self.prefix.len() <= opts.max_prefix_per_node,
                "prefix {:?} exceeds cap",
                self.prefix
            );
            if self.item.is_none() {
                assert!(
                    !self.children.is_empty(),
                    "childless branch node {:?}",
                    self.prefix
                );
                if let Some(only) = self.children.only() {
                    assert!(
                        self.prefix.len() + only.prefix.len() > opts.max_prefix_per_node,
                        "uncompacted single-child node {:?}",
                        self.prefix
                    );
                }
            }
        }
        if self.children.is_dense() {
            assert!(self.children.len() >= opts.max_children_per_sparse_node);
        } else {
            assert!(self.children.len() <= opts.max_children_per_sparse_node);
        }
        for (byte, child) in self.children.ordered() {
            assert_eq!(child.prefix.first(), Some(&byte), "edge byte mismatch");
            child.assert_invariants(false, opts);
        }
    }
}
