/// A trie payload that carries its own key.
///
/// [`Trie::put`](crate::Trie::put) stores a payload at the path spelled by
/// [`key_bytes`](Keyed::key_bytes).
pub trait Keyed {
    /// The full key this payload is stored under.
    fn key_bytes(&self) -> &[u8];
}

impl Keyed for String {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Keyed for Vec<u8> {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl<K: AsRef<[u8]>, V> Keyed for (K, V) {
    fn key_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}
