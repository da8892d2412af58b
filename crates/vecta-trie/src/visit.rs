/// What a traversal callback asks the walker to do next.
///
/// `SkipSubtree` is consumed by the walker; `Abort` stops the walk and its
/// cause is returned verbatim as the walk's `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitFlow<E> {
    /// Keep walking.
    Continue,
    /// Do not descend below the node just visited.
    SkipSubtree,
    /// Stop immediately and hand `E` back to the caller.
    Abort(E),
}

impl<E> VisitFlow<E> {
    /// Returns `true` for [`VisitFlow::Continue`].
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}

impl<E> From<Result<(), E>> for VisitFlow<E> {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Continue,
            Err(e) => Self::Abort(e),
        }
    }
}
