//! In-process store over a shared byte map, for tests and embedding.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use vecta_data::Vector;

use crate::error::{StoreError, StoreResult};
use crate::format::Format;
use crate::retrieval::Retrieval;
use crate::traits::Store;

/// Shared in-process byte space, keyed by retrieval string.
///
/// Every [`MemoryStore`] opened over the same space sees the same data.
#[derive(Clone, Default)]
pub struct MemorySpace {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemorySpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.blobs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes stored under `retrieval`.
    pub fn get(&self, retrieval: &Retrieval) -> Option<Vec<u8>> {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&retrieval.to_string())
            .cloned()
    }

    fn put(&self, retrieval: &Retrieval, bytes: Vec<u8>) {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(retrieval.to_string(), bytes);
    }

    pub fn clear(&self) {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for MemorySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySpace")
            .field("entries", &self.len())
            .finish()
    }
}

/// Store that keeps encoded vectors in a [`MemorySpace`]. Intended for tests
/// and embedding.
pub struct MemoryStore {
    retrieval: Retrieval,
    format: Format,
    space: MemorySpace,
    vector: Option<Arc<Vector>>,
}

impl MemoryStore {
    pub fn new(retrieval: Retrieval, space: MemorySpace) -> Self {
        Self::with_format(retrieval, space, Format::Json)
    }

    pub fn with_format(retrieval: Retrieval, space: MemorySpace, format: Format) -> Self {
        Self {
            retrieval,
            format,
            space,
            vector: None,
        }
    }

    fn stored(&self) -> StoreResult<Vec<u8>> {
        self.space
            .get(&self.retrieval)
            .ok_or_else(|| StoreError::NotFound(self.retrieval.to_string().into()))
    }
}

impl Store for MemoryStore {
    fn out(&mut self) -> StoreResult<()> {
        let vector = self.vector.as_ref().ok_or(StoreError::NoVector)?;
        let bytes = self.format.encode(vector)?;
        debug!(retrieval = %self.retrieval, bytes = bytes.len(), "vector kept in memory");
        self.space.put(&self.retrieval, bytes);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> StoreResult<usize> {
        self.space.put(&self.retrieval, bytes.to_vec());
        Ok(bytes.len())
    }

    fn input(&mut self) -> StoreResult<Arc<Vector>> {
        let bytes = self.stored()?;
        let vector = Arc::new(self.format.decode(&bytes)?);
        self.swap(Arc::clone(&vector));
        Ok(vector)
    }

    fn read(&mut self, buf: &mut [u8]) -> StoreResult<usize> {
        let bytes = self.stored()?;
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn swap(&mut self, vector: Arc<Vector>) {
        if let Some(own) = Retrieval::of_vector(&vector) {
            self.retrieval = own;
        }
        self.vector = Some(vector);
    }

    fn retrieval(&self) -> &Retrieval {
        &self.retrieval
    }

    fn vector(&self) -> Option<&Arc<Vector>> {
        self.vector.as_ref()
    }
}
