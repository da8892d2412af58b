//! Write-only store printing compact JSON to standard output.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::debug;
use vecta_data::Vector;

use crate::error::{StoreError, StoreResult};
use crate::retrieval::Retrieval;
use crate::traits::Store;

/// Write-only store that prints compact JSON.
///
/// The sink defaults to standard output; tests and embedders can supply any
/// other writer.
pub struct StdoutStore {
    retrieval: Retrieval,
    sink: Box<dyn Write + Send>,
    vector: Option<Arc<Vector>>,
}

impl StdoutStore {
    pub fn new() -> Self {
        Self::with_sink(Box::new(io::stdout()))
    }

    pub fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        Self {
            retrieval: Retrieval::from_parts(["STDOUT"]),
            sink,
            vector: None,
        }
    }
}

impl Default for StdoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for StdoutStore {
    fn out(&mut self) -> StoreResult<()> {
        let vector = self.vector.as_ref().ok_or(StoreError::NoVector)?;
        let bytes = vector.to_json(false)?;
        self.sink.write_all(&bytes)?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        debug!(bytes = bytes.len(), "vector printed");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> StoreResult<usize> {
        self.sink.write_all(bytes)?;
        self.sink.flush()?;
        Ok(bytes.len())
    }

    fn input(&mut self) -> StoreResult<Arc<Vector>> {
        Err(StoreError::NotImplemented {
            op: "input",
            store: "STDOUT",
        })
    }

    fn read(&mut self, _buf: &mut [u8]) -> StoreResult<usize> {
        Err(StoreError::NotImplemented {
            op: "read",
            store: "STDOUT",
        })
    }

    /// Printing ignores any address the vector carries.
    fn swap(&mut self, vector: Arc<Vector>) {
        self.vector = Some(vector);
    }

    fn retrieval(&self) -> &Retrieval {
        &self.retrieval
    }

    fn vector(&self) -> Option<&Arc<Vector>> {
        self.vector.as_ref()
    }
}
