use std::collections::BTreeMap;

use kdense_core::traits::Retriever;
use kdense_core::types::{Chunk, RetrievedContext};

use crate::analyzer::Analyzer;

/// Cosine similarity between term-frequency vectors of the query and each
/// chunk. Term maps are ordered so floating-point sums are reproducible.
#[derive(Debug, Clone, Default)]
pub struct CosineRetriever {
    analyzer: Analyzer,
}

type TermFreqs = BTreeMap<String, u32>;

impl CosineRetriever {
    pub fn new() -> Self { Self::default() }

    fn term_freqs(&self, text: &str) -> TermFreqs {
        let mut tf = TermFreqs::new();
        for t in self.analyzer.tokens(text) { *tf.entry(t).or_insert(0) += 1; }
        tf
    }
}

fn norm(tf: &TermFreqs) -> f64 { tf.values().map(|&v| f64::from(v) * f64::from(v)).sum::<f64>().sqrt() }

fn cosine(q: &TermFreqs, q_norm: f64, c: &TermFreqs) -> f64 {
    let c_norm = norm(c);
    if q_norm == 0.0 || c_norm == 0.0 { return 0.0; }
    let dot: f64 = q.iter().map(|(t, &qv)| f64::from(qv) * f64::from(c.get(t).copied().unwrap_or(0))).sum();
    dot / (q_norm * c_norm)
}

impl Retriever for CosineRetriever {
    fn name(&self) -> &'static str { "cosine" }

    fn retrieve(&self, query: &str, corpus: &[Chunk], k: usize) -> anyhow::Result<RetrievedContext> {
        if k == 0 || corpus.is_empty() { return Ok(RetrievedContext::empty()); }
        let q = self.term_freqs(query);
        if q.is_empty() { return Ok(RetrievedContext::empty()); }
        let q_norm = norm(&q);
        #[allow(clippy::cast_possible_truncation)]
        let scored = corpus
            .iter()
            .enumerate()
            .map(|(i, c)| (i, cosine(&q, q_norm, &self.term_freqs(&c.text)) as f32))
            .collect();
        Ok(crate::rank(scored, corpus, k))
    }
}
