//! The contract every store backend implements.

use std::sync::Arc;

use vecta_data::Vector;

use crate::error::StoreResult;
use crate::retrieval::Retrieval;

/// A destination a [`Vector`] can be written to and, for most
/// implementations, read back from.
///
/// A store works on one vector at a time, chosen with
/// [`swap`](Store::swap). Swapping in a vector that carries its own address
/// (see [`RETRIEVAL_KEY`](crate::RETRIEVAL_KEY)) redirects the store there.
pub trait Store: Send {
    /// Encode the swapped-in vector to the destination, replacing whatever
    /// was there.
    fn out(&mut self) -> StoreResult<()>;

    /// Replace the destination's contents with raw bytes.
    fn write(&mut self, bytes: &[u8]) -> StoreResult<usize>;

    /// Decode the vector at the destination and swap it in.
    fn input(&mut self) -> StoreResult<Arc<Vector>>;

    /// Read raw bytes from the destination into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> StoreResult<usize>;

    /// Make `vector` the subject of subsequent `out` calls.
    fn swap(&mut self, vector: Arc<Vector>);

    /// The current address.
    fn retrieval(&self) -> &Retrieval;

    /// The swapped-in vector, if any.
    fn vector(&self) -> Option<&Arc<Vector>>;
}
