//! Domain types shared by the store, the retrievers and the orchestrator.

use serde::{Deserialize, Serialize};

pub type DocId = String;
pub type ChunkId = String;

/// A loaded source file.
///
/// - `id`: stable identity derived from the path relative to the loaded directory
/// - `source`: original path to the file
/// - `title`: first markdown heading, or the file stem
/// - `text`: full decoded content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub source: String,
    pub title: String,
    pub text: String,
}

/// A bounded slice of a document, the unit of retrieval.
///
/// `doc_id` refers back to the parent `Document`; `offset` is the byte offset
/// of the (trimmed) slice inside the parent text and `index` its position
/// among the parent's chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: DocId,
    pub source: String,
    pub offset: usize,
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Ranked context for one query. Scores are non-negative and non-increasing;
/// equal scores keep corpus order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    pub entries: Vec<ScoredChunk>,
}

impl RetrievedContext {
    pub fn empty() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredChunk> { self.entries.iter() }

    /// Distinct sources in rank order.
    pub fn sources(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.chunk.source) { out.push(e.chunk.source.clone()); }
        }
        out
    }
}

/// A single research question plus optional structured hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancer_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_profile: Option<String>,
}

impl AgentQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_drug(mut self, drug: impl Into<String>) -> Self {
        self.drug = non_blank(drug.into());
        self
    }

    #[must_use]
    pub fn with_cancer_type(mut self, cancer_type: impl Into<String>) -> Self {
        self.cancer_type = non_blank(cancer_type.into());
        self
    }

    #[must_use]
    pub fn with_tool_profile(mut self, profile: impl Into<String>) -> Self {
        self.tool_profile = non_blank(profile.into());
        self
    }
}

fn non_blank(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source: &str) -> Chunk {
        Chunk { id: format!("{source}:0"), doc_id: source.into(), source: source.into(), offset: 0, index: 0, text: "x".into() }
    }

    #[test]
    fn blank_hints_are_dropped() {
        let q = AgentQuery::new("q").with_drug("  ").with_cancer_type(" NSCLC ");
        assert_eq!(q.drug, None);
        assert_eq!(q.cancer_type.as_deref(), Some("NSCLC"));
    }

    #[test]
    fn sources_are_deduplicated_in_rank_order() {
        let ctx = RetrievedContext {
            entries: vec![
                ScoredChunk { chunk: chunk("b.md"), score: 0.9 },
                ScoredChunk { chunk: chunk("a.md"), score: 0.5 },
                ScoredChunk { chunk: chunk("b.md"), score: 0.1 },
            ],
        };
        assert_eq!(ctx.sources(), vec!["b.md".to_string(), "a.md".to_string()]);
    }
}
