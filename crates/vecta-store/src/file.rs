//! File-backed store writing `directory/file.format`.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use vecta_data::Vector;

use crate::error::{StoreError, StoreResult};
use crate::format::Format;
use crate::retrieval::Retrieval;
use crate::traits::Store;

/// A store backed by a single file at `directory/file.format`.
///
/// Missing parent directories are created on write; every write truncates.
pub struct FileStore {
    retrieval: Retrieval,
    format: Format,
    vector: Option<Arc<Vector>>,
}

impl FileStore {
    pub fn new(retrieval: Retrieval, format: Format) -> Self {
        Self {
            retrieval,
            format,
            vector: None,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    fn writable_path(&self) -> StoreResult<PathBuf> {
        let path = self.retrieval.path()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    fn readable_path(&self) -> StoreResult<PathBuf> {
        let path = self.retrieval.path()?;
        if !path.is_file() {
            return Err(StoreError::NotFound(path));
        }
        Ok(path)
    }
}

impl Store for FileStore {
    fn out(&mut self) -> StoreResult<()> {
        let vector = self.vector.as_ref().ok_or(StoreError::NoVector)?;
        let bytes = self.format.encode(vector)?;
        let path = self.writable_path()?;
        fs::write(&path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), format = self.format.name(), "vector written");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> StoreResult<usize> {
        let path = self.writable_path()?;
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "raw write");
        Ok(bytes.len())
    }

    fn input(&mut self) -> StoreResult<Arc<Vector>> {
        let path = self.readable_path()?;
        let bytes = fs::read(&path)?;
        let vector = Arc::new(self.format.decode(&bytes)?);
        debug!(path = %path.display(), items = vector.len(), "vector read");
        self.swap(Arc::clone(&vector));
        Ok(vector)
    }

    fn read(&mut self, buf: &mut [u8]) -> StoreResult<usize> {
        let path = self.readable_path()?;
        let n = fs::File::open(&path)?.read(buf)?;
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
