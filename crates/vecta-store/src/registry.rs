//! Store lookup by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use vecta_data::Vector;

use crate::error::{StoreError, StoreResult};
use crate::file::FileStore;
use crate::format::Format;
use crate::memory::{MemorySpace, MemoryStore};
use crate::retrieval::Retrieval;
use crate::stdout::StdoutStore;
use crate::traits::Store;

/// Constructor for a store at a given address.
pub type StoreFn = Arc<dyn Fn(Retrieval) -> Box<dyn Store> + Send + Sync>;

/// Name of the stdout store.
pub const STDOUT: &str = "STDOUT";
/// Name of the in-memory store.
pub const MEMORY: &str = "memory";

/// Maps store names (the first retrieval part) to constructors.
///
/// The default registry knows `STDOUT`, `json`, `jsonf`, `yaml` and
/// `memory`. Every `memory` store it builds shares one [`MemorySpace`].
#[derive(Clone)]
pub struct StoreRegistry {
    makers: HashMap<String, StoreFn>,
    space: MemorySpace,
}

impl StoreRegistry {
    /// A registry with no stores at all.
    pub fn empty() -> Self {
        Self {
            makers: HashMap::new(),
            space: MemorySpace::new(),
        }
    }

    /// The memory space behind the `memory` store.
    pub fn memory_space(&self) -> &MemorySpace {
        &self.space
    }

    /// Register (or replace) the constructor for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, make: F)
    where
        F: Fn(Retrieval) -> Box<dyn Store> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(store = %name, "store registered");
        self.makers.insert(name, Arc::new(make));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.makers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.makers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the store registered under `name`, addressed at `retrieval`.
    pub fn get(&self, name: &str, retrieval: Retrieval) -> StoreResult<Box<dyn Store>> {
        let make = self
            .makers
            .get(name)
            .ok_or_else(|| StoreError::UnknownStore(name.to_string()))?;
        Ok(make(retrieval))
    }

    /// Build the store named by the address itself.
    pub fn open(&self, retrieval: &Retrieval) -> StoreResult<Box<dyn Store>> {
        self.get(retrieval.format(), retrieval.clone())
    }

    /// Build the store the vector addresses itself to, with the vector
    /// already swapped in.
    pub fn for_vector(&self, vector: Arc<Vector>) -> StoreResult<Box<dyn Store>> {
        let retrieval =
            Retrieval::of_vector(&vector).ok_or_else(|| StoreError::MalformedRetrieval {
                retrieval: String::new(),
                reason: format!("vector {} carries no address", vector.tag()),
            })?;
        let mut store = self.open(&retrieval)?;
        store.swap(vector);
        Ok(store)
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(STDOUT, |_| Box::new(StdoutStore::new()));
        for format in [Format::Json, Format::JsonPretty, Format::Yaml] {
            registry.register(format.name(), move |r| Box::new(FileStore::new(r, format)));
        }
        let space = registry.space.clone();
        registry.register(MEMORY, move |r| {
            Box::new(MemoryStore::new(r, space.clone()))
        });
        registry
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("names", &self.names())
            .field("space", &self.space)
            .finish()
    }
}
