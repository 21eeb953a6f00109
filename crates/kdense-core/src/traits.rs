use crate::types::{Chunk, RetrievedContext};

/// Lexical scoring of chunks against a query.
///
/// Implementations must be deterministic for a fixed corpus and query, return
/// at most `k` entries with non-negative, non-increasing scores, and keep
/// corpus order among equal scores.
pub trait Retriever: Send + Sync {
    fn name(&self) -> &'static str;
    fn retrieve(&self, query: &str, corpus: &[Chunk], k: usize) -> anyhow::Result<RetrievedContext>;
}
