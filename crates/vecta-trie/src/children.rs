//! Outgoing edge storage for a trie node.
//!
//! A node's children are indexed by the first byte of each child's prefix.
//! Low fan-out nodes keep a short unordered list that is scanned linearly;
//! once the list grows past the configured threshold it is rebuilt as a
//! 256-slot table indexed directly by byte. Both forms answer every query
//! identically, only the cost differs.

use std::mem;

use tracing::trace;

use crate::node::Node;

/// The set of edges leaving one node.
#[derive(Clone)]
pub(crate) enum Children<T> {
    /// Unordered `(first byte, child)` pairs.
    Sparse(Vec<(u8, Box<Node<T>>)>),
    /// Direct-indexed slot table.
    Dense(Dense<T>),
}

/// 256-slot child table.
#[derive(Clone)]
pub(crate) struct Dense<T> {
    slots: Box<[Option<Box<Node<T>>>]>,
    len: usize,
}

impl<T> Dense<T> {
    fn new() -> Self {
        Self {
            slots: (0..256).map(|_| None).collect(),
            len: 0,
        }
    }
}

impl<T> Default for Children<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Children<T> {
    /// An empty, sparse edge set.
    pub(crate) fn new() -> Self {
        Self::Sparse(Vec::new())
    }

    /// Number of edges.
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Sparse(edges) => edges.len(),
            Self::Dense(dense) => dense.len,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }

    /// The child whose prefix starts with `byte`.
    pub(crate) fn get(&self, byte: u8) -> Option<&Node<T>> {
        match self {
            Self::Sparse(edges) => edges
                .iter()
                .find(|(b, _)| *b == byte)
                .map(|(_, child)| child.as_ref()),
            Self::Dense(dense) => dense.slots[byte as usize].as_deref(),
        }
    }

    pub(crate) fn get_mut(&mut self, byte: u8) -> Option<&mut Node<T>> {
        match self {
            Self::Sparse(edges) => edges
                .iter_mut()
                .find(|(b, _)| *b == byte)
                .map(|(_, child)| child.as_mut()),
            Self::Dense(dense) => dense.slots[byte as usize].as_deref_mut(),
        }
    }

    /// Attach `child` under `byte`, returning the child it displaced.
    ///
    /// A sparse set that ends up with more than `max_sparse` edges is
    /// rebuilt as a dense table.
    pub(crate) fn insert(
        &mut self,
        byte: u8,
        child: Box<Node<T>>,
        max_sparse: usize,
    ) -> Option<Box<Node<T>>> {
        match self {
            Self::Sparse(edges) => {
                if let Some((_, slot)) = edges.iter_mut().find(|(b, _)| *b == byte) {
                    return Some(mem::replace(slot, child));
                }
                edges.push((byte, child));
                if edges.len() > max_sparse {
                    self.grow();
                }
                None
            }
            Self::Dense(dense) => {
                let previous = dense.slots[byte as usize].replace(child);
                if previous.is_none() {
                    dense.len += 1;
                }
                previous
            }
        }
    }

    /// Detach the child under `byte`. Absent bytes are a no-op returning
    /// `None`.
    ///
    /// A dense table that drops below `max_sparse` edges is rebuilt as a
    /// sparse list.
    pub(crate) fn remove(&mut self, byte: u8, max_sparse: usize) -> Option<Box<Node<T>>> {
        match self {
            Self::Sparse(edges) => {
                let idx = edges.iter().position(|(b, _)| *b == byte)?;
                Some(edges.swap_remove(idx).1)
            }
            Self::Dense(dense) => {
                let removed = dense.slots[byte as usize].take()?;
                dense.len -= 1;
                if dense.len < max_sparse {
                    self.shrink();
                }
                Some(removed)
            }
        }
    }

    /// The single child, if there is exactly one.
    pub(crate) fn only(&self) -> Option<&Node<T>> {
        if self.len() != 1 {
            return None;
        }
        self.ordered().next().map(|(_, child)| child)
    }

    /// Detach and return the single child, if there is exactly one.
    pub(crate) fn take_only(&mut self) -> Option<Box<Node<T>>> {
        let byte = self.only()?.prefix.first().copied()?;
        self.remove(byte, 0)
    }

    /// Children in ascending byte order.
    pub(crate) fn ordered(&self) -> Ordered<'_, T> {
        match self {
            Self::Sparse(edges) => {
                let mut sorted: Vec<(u8, &Node<T>)> =
                    edges.iter().map(|(b, child)| (*b, child.as_ref())).collect();
                sorted.sort_unstable_by_key(|(b, _)| *b);
                Ordered::Sparse(sorted.into_iter())
            }
            Self::Dense(dense) => Ordered::Dense(dense.slots.iter().enumerate()),
        }
    }

    /// Consume the set, yielding owned children in ascending byte order.
    pub(crate) fn into_ordered(self) -> Vec<Box<Node<T>>> {
        match self {
            Self::Sparse(mut edges) => {
                edges.sort_unstable_by_key(|(b, _)| *b);
                edges.into_iter().map(|(_, child)| child).collect()
            }
            Self::Dense(dense) => dense.slots.into_vec().into_iter().flatten().collect(),
        }
    }

    fn grow(&mut self) {
        if let Self::Sparse(edges) = self {
            let mut dense = Dense::new();
            for (byte, child) in edges.drain(..) {
                dense.slots[byte as usize] = Some(child);
                dense.len += 1;
            }
            trace!(edges = dense.len, "children converted sparse -> dense");
            *self = Self::Dense(dense);
        }
    }

    fn shrink(&mut self) {
        if let Self::Dense(dense) = self {
            let edges: Vec<(u8, Box<Node<T>>)> = dense
                .slots
                .iter_mut()
                .enumerate()
                .filter_map(|(i, slot)| slot.take().map(|child| (i as u8, child)))
                .collect();
            trace!(edges = edges.len(), "children converted dense -> sparse");
            *self = Self::Sparse(edges);
        }
    }
}

/// Ascending-byte iterator over a node's children.
pub(crate) enum Ordered<'a, T> {
    Sparse(std::vec::IntoIter<(u8, &'a Node<T>)>),
    Dense(std::iter::Enumerate<std::slice::Iter<'a, Option<Box<Node<T>>>>>),
}

impl<'a, T> Iterator for Ordered<'a, T> {
    type Item = (u8, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Sparse(it) => it.next(),
            Self::Dense(it) => it.find_map(|(i, slot)| slot.as_deref().map(|c| (i as u8, c))),
        }
    }
}

impl<T> DoubleEndedIterator for Ordered<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self {
            Self::Sparse(it) => it.next_back(),
            Self::Dense(it) => {
                while let Some((i, slot)) = it.next_back() {
                    if let Some(child) = slot.as_deref() {
                        return Some((i as u8, child));
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(prefix: &[u8], value: u32) -> Box<Node<u32>> {
        Box::new(Node::new(prefix.to_vec(), Some(value)))
    }

    fn filled(bytes: &[u8], max_sparse: usize) -> Children<u32> {
        let mut children = Children::new();
        for (i, b) in bytes.iter().enumerate() {
            assert!(children.insert(*b, leaf(&[*b], i as u32), max_sparse).is_none());
        }
        children
    }

    #[test]
    fn starts_sparse_and_empty() {
        let children: Children<u32> = Children::new();
        assert!(children.is_empty());
        assert!(!children.is_dense());
        assert!(children.get(b'a').is_none());
    }

    #[test]
    fn grows_dense_past_threshold() {
        let children = filled(b"abcd", 4);
        assert!(!children.is_dense());

        let children = filled(b"abcde", 4);
        assert!(children.is_dense());
        assert_eq!(children.len(), 5);
    }

    #[test]
    fn sparse_and_dense_answer_alike() {
        let bytes = b"zqamxb";
        let sparse = filled(bytes, 64);
        let dense = filled(bytes, 1);
        assert!(!sparse.is_dense());
        assert!(dense.is_dense());

        for b in 0..=255u8 {
            let s = sparse.get(b).and_then(|n| n.item);
            let d = dense.get(b).and_then(|n| n.item);
            assert_eq!(s, d, "byte {b}");
        }

        let s: Vec<u8> = sparse.ordered().map(|(b, _)| b).collect();
        let d: Vec<u8> = dense.ordered().map(|(b, _)| b).collect();
        assert_eq!(s, b"abmqxz".to_vec());
        assert_eq!(s, d);
    }

    #[test]
    fn ordered_reverses() {
        let dense = filled(b"cab", 1);
        let rev: Vec<u8> = dense.ordered().rev().map(|(b, _)| b).collect();
        assert_eq!(rev, b"cba".to_vec());

        let sparse = filled(b"cab", 8);
        let rev: Vec<u8> = sparse.ordered().rev().map(|(b, _)| b).collect();
        assert_eq!(rev, b"cba".to_vec());
    }

    #[test]
    fn insert_replaces_existing_edge() {
        let mut children = filled(b"ab", 8);
        let old = children.insert(b'a', leaf(b"a", 99), 8).unwrap();
        assert_eq!(old.item, Some(0));
        assert_eq!(children.len(), 2);
        assert_eq!(children.get(b'a').unwrap().item, Some(99));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut children = filled(b"ab", 8);
        assert!(children.remove(b'z', 8).is_none());
        assert_eq!(children.len(), 2);

        let mut dense = filled(b"abc", 1);
        assert!(dense.remove(b'z', 1).is_none());
        assert_eq!(dense.len(), 3);
    }

    #[test]
    fn shrinks_back_to_sparse() {
        let mut children = filled(b"abcdef", 4);
        assert!(children.is_dense());

        assert!(children.remove(b'a', 4).is_some());
        assert!(children.remove(b'b', 4).is_some());
        // 4 edges left: not below the threshold yet.
        assert!(children.is_dense());

        assert!(children.remove(b'c', 4).is_some());
        assert!(!children.is_dense());
        let left: Vec<u8> = children.ordered().map(|(b, _)| b).collect();
        assert_eq!(left, b"def".to_vec());
    }

    #[test]
    fn take_only_requires_single_child() {
        let mut two = filled(b"ab", 8);
        assert!(two.take_only().is_none());

        let mut one = filled(b"q", 8);
        let child = one.take_only().unwrap();
        assert_eq!(child.prefix, b"q".to_vec());
        assert!(one.is_empty());
    }

    #[test]
    fn into_ordered_sorts() {
        let owned: Vec<u8> = filled(b"dbca", 8)
            .into_ordered()
            .into_iter()
            .map(|c| c.prefix[0])
            .collect();
        assert_eq!(owned, b"abcd".to_vec());

        let owned: Vec<u8> = filled(b"dbca", 1)
            .into_ordered()
            .into_iter()
            .map(|c| c.prefix[0])
            .collect();
        assert_eq!(owned, b"abcd".to_vec());
    }
}
