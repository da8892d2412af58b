//! Ordered iteration without recursion.

use crate::node::Node;

/// Borrowing iterator over a [`Trie`](crate::Trie), in ascending key order.
///
/// Yields owned keys: the trie stores prefix segments, not whole keys.
pub struct Iter<'a, T> {
    // (path of the node's parent, node)
    stack: Vec<(Vec<u8>, &'a Node<T>)>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Node<T>) -> Self {
        Self {
            stack: vec![(Vec::new(), root)],
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Vec<u8>, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((mut path, node)) = self.stack.pop() {
            path.extend_from_slice(&node.prefix);
            for (_, child) in node.children.ordered().rev() {
                self.stack.push((path.clone(), child));
            }
            if let Some(item) = &node.item {
                return Some((path, item));
            }
        }
        None
    }
}
