//! Construction options and their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{TrieError, TrieResult};

/// Default cap on the length of a single node's prefix.
pub const DEFAULT_MAX_PREFIX_PER_NODE: usize = 10;

/// Default number of edges a node keeps in sparse form.
pub const DEFAULT_MAX_CHILDREN_PER_SPARSE_NODE: usize = 8;

/// Construction options for a [`Trie`](crate::Trie).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieOptions {
    /// Soft cap on a single node's prefix length. Longer insert suffixes are
    /// laid down as a chain of nodes no longer than this.
    pub max_prefix_per_node: usize,
    /// Edge count above which a node's children switch from the sparse list
    /// to the dense 256-slot table.
    pub max_children_per_sparse_node: usize,
}

impl Default for TrieOptions {
    fn default() -> Self {
        Self {
            max_prefix_per_node: DEFAULT_MAX_PREFIX_PER_NODE,
            max_children_per_sparse_node: DEFAULT_MAX_CHILDREN_PER_SPARSE_NODE,
        }
    }
}

impl TrieOptions {
    /// Set the prefix cap.
    pub fn max_prefix_per_node(mut self, n: usize) -> Self {
        self.max_prefix_per_node = n;
        self
    }

    /// Set the sparse/dense threshold.
    pub fn max_children_per_sparse_node(mut self, n: usize) -> Self {
        self.max_children_per_sparse_node = n;
        self
    }

    /// Check that both options are positive.
    pub fn validate(&self) -> TrieResult<()> {
        if self.max_prefix_per_node == 0 {
            return Err(TrieError::InvalidOption {
                name: "max_prefix_per_node",
                reason: "must be positive".to_string(),
            });
        }
        if self.max_children_per_sparse_node == 0 {
            return Err(TrieError::InvalidOption {
                name: "max_children_per_sparse_node",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
