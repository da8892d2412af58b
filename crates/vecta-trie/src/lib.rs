//! Compressed prefix trie (patricia trie) for the vecta store.
//!
//! Keys are byte strings; every node owns a multi-byte prefix segment, an
//! optional payload, and a set of outgoing edges indexed by the first byte
//! of each child's prefix. Edge sets start out sparse (a short unordered
//! list) and switch to a dense 256-slot table once their fan-out passes
//! [`TrieOptions::max_children_per_sparse_node`].
//!
//! # Key Types
//!
//! - [`Trie`] -- The trie itself: get/put/delete/match/visit
//! - [`TrieOptions`] -- Construction options (prefix cap, sparse threshold)
//! - [`Keyed`] -- Implemented by payloads that know their own key
//! - [`VisitFlow`] -- Callback result steering a traversal
//!
//! # Invariants
//!
//! - No two sibling edges share a first byte.
//! - The concatenated prefixes along a root-to-node path spell exactly one
//!   key per payload-bearing node.
//! - No non-root node is left without both payload and children, and no
//!   non-root node is left with a single child and no payload unless the
//!   merged prefix would exceed [`TrieOptions::max_prefix_per_node`].
//!
//! The trie holds no locks. Callers that share one across threads wrap it
//! themselves; traversal callbacks must not mutate the trie being walked.

pub mod error;
pub mod iter;
pub mod options;
pub mod traits;
pub mod trie;
pub mod visit;

mod children;
mod node;

pub use error::{TrieError, TrieResult};
pub use iter::Iter;
pub use options::{
    TrieOptions, DEFAULT_MAX_CHILDREN_PER_SPARSE_NODE, DEFAULT_MAX_PREFIX_PER_NODE,
};
pub use traits::Keyed;
pub use trie::Trie;
pub use visit::VisitFlow;

#[cfg(test)]
mod proptests;
