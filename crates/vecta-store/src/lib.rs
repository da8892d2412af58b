//! Serialization stores for vecta vectors.
//!
//! A store moves one [`Vector`](vecta_data::Vector) at a time between memory
//! and a destination named by a [`Retrieval`] address of the form
//! `format:directory:file`. The first part picks the store out of a
//! [`StoreRegistry`]; file-backed stores write to `directory/file.format`.
//!
//! # Key Types
//!
//! - [`Store`] -- the out/input/swap contract every backend implements
//! - [`Retrieval`] -- a store address, optionally carried by the vector itself
//! - [`Format`] -- JSON, indented JSON and YAML codecs
//! - [`StoreRegistry`] -- name to constructor map
//!
//! # Storage Backends
//!
//! - [`StdoutStore`] -- write-only compact JSON (`STDOUT`)
//! - [`FileStore`] -- `json`, `jsonf` and `yaml` files
//! - [`MemoryStore`] -- a shared in-process [`MemorySpace`] (`memory`)
//!
//! # Round Trips
//!
//! Writing a vector out and reading it back yields equal keys and tag. Values
//! pass through type inference on the way in, so a whole-valued float comes
//! back as an integer and an unsigned value that fits a signed integer comes
//! back signed.

pub mod error;
pub mod file;
pub mod format;
pub mod memory;
pub mod registry;
pub mod retrieval;
pub mod stdout;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use format::Format;
pub use memory::{MemorySpace, MemoryStore};
pub use registry::{StoreFn, StoreRegistry, MEMORY, STDOUT};
pub use retrieval::{Retrieval, RETRIEVAL_KEY};
pub use stdout::StdoutStore;
pub use traits::Store;
