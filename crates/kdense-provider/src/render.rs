//! Narrative rendering of a structured answer.
//!
//! Every backend's answer is rendered by the same code, so the free-text
//! part of a response has one format regardless of where it came from.

use std::fmt::Write as _;

use kdense_core::answer::StructuredAnswer;
use kdense_core::response::Provenance;

use crate::GenerationRequest;

pub const STUB_BANNER: &str = "> Stub answer: no language model produced this text.";

pub fn render_text(request: &GenerationRequest<'_>, answer: &StructuredAnswer, provenance: &Provenance) -> String {
    let q = request.query;
    let mut out = String::from("# KDense research brief\n\n");
    if provenance.is_stub() {
        out.push_str(STUB_BANNER);
        if let Some(reason) = &provenance.fallback {
            let _ = write!(out, " Requested provider '{}': {reason}.", provenance.requested);
        }
        out.push_str("\n\n");
    }
    let _ = writeln!(out, "Question: {}", q.query);
    if let Some(d) = &q.drug { let _ = writeln!(out, "Drug: {d}"); }
    if let Some(c) = &q.cancer_type { let _ = writeln!(out, "Cancer type: {c}"); }

    out.push_str("\n## 1. Findings\n\n");
    let _ = writeln!(out, "{}", answer.hypothesis.summary);

    out.push_str("\n## 2. Mechanisms\n\n");
    for p in &answer.pathways {
        let _ = write!(out, "- **{}** ({}, confidence {:.2}): {}", p.name, p.category, p.confidence, p.description);
        if !p.genes.is_empty() { let _ = write!(out, " Genes: {}.", p.genes.join(", ")); }
        out.push('\n');
    }
    let _ = writeln!(out, "\nProposed mechanism: {}", answer.hypothesis.mechanism);

    out.push_str("\n## 3. Target shortlist\n\n");
    if answer.targets.is_empty() { out.push_str("No targets identified.\n"); }
    for t in &answer.targets {
        let _ = write!(out, "- **{}** [{}, druggability {}]: {}", t.name, t.kind, t.druggability.as_str(), t.description);
        if !t.known_drugs.is_empty() { let _ = write!(out, " Known drugs: {}.", t.known_drugs.join(", ")); }
        out.push('\n');
    }

    out.push_str("\n## 4. Validation plan\n\n");
    let _ = writeln!(out, "- Intervention: {}", answer.hypothesis.intervention);
    let _ = writeln!(out, "- Validation: {}", answer.hypothesis.validation);
    let _ = writeln!(out, "- Hypothesis confidence: {:.2}", answer.hypothesis.confidence);

    out.push_str("\n## Planned tool calls\n\n");
    if request.plan.is_empty() { out.push_str("None.\n"); }
    for step in &request.plan.steps {
        let _ = write!(out, "- {} ({})", step.tool, step.rationale);
        if !step.unresolved.is_empty() { let _ = write!(out, "; needs {}", step.unresolved.join(", ")); }
        out.push('\n');
    }

    out.push_str("\n## Sources\n\n");
    let sources = request.context.sources();
    if sources.is_empty() { out.push_str("No local literature matched.\n"); }
    for s in sources {
        let _ = writeln!(out, "- {s}");
    }
    out
}
