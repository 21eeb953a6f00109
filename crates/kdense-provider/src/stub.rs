//! Deterministic backend used when no model is configured or reachable.
//!
//! The answer is a pure function of the request: gene-like symbols are read
//! off the retrieved chunks in ranking order and arranged into the same
//! structured shape a model would return. No inference is claimed.

use std::collections::BTreeSet;

use kdense_core::answer::{Druggability, Hypothesis, Pathway, StructuredAnswer, Target};
use kdense_core::response::ProviderKind;

use crate::parse::{MAX_GENES, MAX_TARGETS};
use crate::{GenerationBackend, GenerationRequest, ProviderError};

pub const STUB_MODEL: &str = "deterministic-stub";

const SIGNALS_PATHWAY: &str = "Context-derived signals";
const UNRESOLVED_PATHWAY: &str = "Unresolved mechanism";

/// Uppercase words that look like gene symbols but are not.
const NOT_GENES: &[&str] = &[
    "AND", "THE", "FOR", "WITH", "NOT", "DNA", "RNA", "MRNA", "CDNA", "SIRNA", "SHRNA", "PCR", "QPCR", "NSCLC",
    "SCLC", "CRC", "HCC", "AML", "CLL", "IC50", "EC50", "GI50", "FDA", "EMA", "WHO", "USA", "ATP", "ADP", "ROS",
    "NGS", "WGS", "WES", "TCGA", "CCLE", "GDSC", "GEO", "OS", "PFS", "HR", "CI", "SD", "SEM", "KO", "WT",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

impl StubBackend {
    pub fn answer(&self, request: &GenerationRequest<'_>) -> StructuredAnswer {
        let mut genes: Vec<(String, String)> = Vec::new();
        let mut seen = BTreeSet::new();
        for entry in request.context.iter() {
            for token in entry.chunk.text.split(|c: char| !c.is_ascii_alphanumeric()) {
                if is_gene_like(token) && seen.insert(token.to_string()) {
                    genes.push((token.to_string(), entry.chunk.source.clone()));
                }
            }
        }

        let drug = request.query.drug.as_deref();
        let cancer = request.query.cancer_type.as_deref();
        let symbols: Vec<&str> = genes.iter().map(|(g, _)| g.as_str()).take(MAX_GENES).collect();

        let pathway = if symbols.is_empty() {
            Pathway {
                name: UNRESOLVED_PATHWAY.into(),
                description: "No gene-level evidence was found in the retrieved literature.".into(),
                genes: Vec::new(),
                confidence: 0.0,
                category: "Other".into(),
            }
        } else {
            Pathway {
                name: SIGNALS_PATHWAY.into(),
                description: format!("Gene symbols recurring in the retrieved literature: {}.", symbols.join(", ")),
                genes: symbols.iter().map(|s| (*s).to_string()).collect(),
                confidence: 0.25,
                category: "Other".into(),
            }
        };

        let targets = genes
            .iter()
            .take(MAX_TARGETS)
            .map(|(g, source)| Target {
                name: g.clone(),
                kind: "Gene".into(),
                description: format!("Mentioned in {source}."),
                druggability: Druggability::Medium,
                known_drugs: drug.map(|d| vec![d.to_string()]).unwrap_or_default(),
                pathways: vec![pathway.name.clone()],
            })
            .collect();

        let hypothesis = match symbols.first() {
            None => Hypothesis {
                summary: "Insufficient evidence for a concise hypothesis.".into(),
                mechanism: "Not inferred; no language model was consulted.".into(),
                intervention: "No intervention suggested.".into(),
                validation: "Add literature on the question to the document folder or configure a provider.".into(),
                confidence: 0.0,
            },
            Some(first) => Hypothesis {
                summary: format!(
                    "The retrieved literature repeatedly mentions {}{}.",
                    symbols.join(", "),
                    drug.map(|d| format!(" in connection with {d} response")).unwrap_or_default()
                ),
                mechanism: "Not inferred; no language model was consulted.".into(),
                intervention: format!(
                    "Perturb {first} by knockdown or inhibition{}.",
                    cancer.map(|c| format!(" in {c} models")).unwrap_or_default()
                ),
                validation: "Review the cited sources, then rerun with a configured provider.".into(),
                confidence: 0.0,
            },
        };

        StructuredAnswer { pathways: vec![pathway], targets, hypothesis }
    }
}

impl GenerationBackend for StubBackend {
    fn kind(&self) -> ProviderKind { ProviderKind::Stub }

    fn model(&self) -> &str { STUB_MODEL }

    fn complete(&self, request: &GenerationRequest<'_>, _prompt: &str) -> Result<String, ProviderError> {
        serde_json::to_string(&self.answer(request)).map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

/// 3 to 10 ASCII chars, a leading uppercase letter, the rest uppercase
/// letters or digits.
fn is_gene_like(token: &str) -> bool {
    let len = token.len();
    if !(3..=10).contains(&len) { return false; }
    let mut chars = token.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_uppercase()) { return false; }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) && !NOT_GENES.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdense_core::tooling::ToolPlan;
    use kdense_core::types::{AgentQuery, Chunk, RetrievedContext, ScoredChunk};

    fn ctx(texts: &[(&str, &str)]) -> RetrievedContext {
        let entries = texts
            .iter()
            .enumerate()
            .map(|(i, (src, text))| ScoredChunk {
                chunk: Chunk { id: format!("d{i}:0"), doc_id: format!("d{i}"), source: (*src).into(), offset: 0, index: 0, text: (*text).into() },
                score: 1.0,
            })
            .collect();
        RetrievedContext { entries }
    }

    #[test]
    fn gene_like_tokens() {
        assert!(is_gene_like("EGFR"));
        assert!(is_gene_like("TP53"));
        assert!(is_gene_like("ERCC1"));
        assert!(!is_gene_like("Egfr"));
        assert!(!is_gene_like("5FU"));
        assert!(!is_gene_like("DNA"));
        assert!(!is_gene_like("NSCLC"));
        assert!(!is_gene_like("AB"));
    }

    #[test]
    fn genes_follow_context_order_without_duplicates() {
        let q = AgentQuery::new("resistance").with_drug("cisplatin").with_cancer_type("NSCLC");
        let c = ctx(&[("a.md", "ERCC1 and EGFR in NSCLC; EGFR again"), ("b.md", "TP53 loss, ERCC1")]);
        let plan = ToolPlan::empty();
        let a = StubBackend.answer(&GenerationRequest { query: &q, context: &c, plan: &plan });

        assert_eq!(a.pathways[0].genes, vec!["ERCC1", "EGFR", "TP53"]);
        let names: Vec<&str> = a.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["ERCC1", "EGFR", "TP53"]);
        assert_eq!(a.targets[2].description, "Mentioned in b.md.");
        assert_eq!(a.targets[0].known_drugs, vec!["cisplatin"]);
        assert!(a.hypothesis.intervention.contains("ERCC1"));
        assert!(a.hypothesis.intervention.contains("NSCLC models"));
    }

    #[test]
    fn empty_context_still_has_content() {
        let q = AgentQuery::new("anything");
        let c = RetrievedContext::empty();
        let plan = ToolPlan::empty();
        let a = StubBackend.answer(&GenerationRequest { query: &q, context: &c, plan: &plan });
        assert!(a.has_content());
        assert_eq!(a.pathways[0].name, UNRESOLVED_PATHWAY);
        assert!(a.targets.is_empty());
    }
}
