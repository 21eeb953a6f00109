//! kdense-text
//!
//! Lexical retrieval over document chunks. Both retrievers share one Tantivy
//! analyzer so that query terms, chunk terms and tool tags are normalised the
//! same way.

pub mod analyzer;
pub mod bm25;
pub mod cosine;

pub use analyzer::Analyzer;
pub use bm25::Bm25Retriever;
pub use cosine::CosineRetriever;

use kdense_core::config::ScorerKind;
use kdense_core::traits::Retriever;
use kdense_core::types::{Chunk, RetrievedContext, ScoredChunk};

pub fn retriever_for(kind: ScorerKind) -> Box<dyn Retriever> {
    match kind {
        ScorerKind::Cosine => Box::new(CosineRetriever::new()),
        ScorerKind::Bm25 => Box::new(Bm25Retriever::new()),
    }
}

/// Order `(corpus_index, score)` pairs by descending score, keeping corpus
/// order among ties, drop non-positive scores and keep the first `k`.
pub(crate) fn rank(mut scored: Vec<(usize, f32)>, corpus: &[Chunk], k: usize) -> RetrievedContext {
    scored.retain(|(_, s)| *s > 0.0 && s.is_finite());
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.truncate(k);
    let entries = scored.into_iter().map(|(i, score)| ScoredChunk { chunk: corpus[i].clone(), score }).collect();
    RetrievedContext { entries }
}
