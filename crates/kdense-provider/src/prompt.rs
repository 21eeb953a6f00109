//! Prompt assembly for the network backends.

use std::fmt::Write as _;

use crate::GenerationRequest;

/// Longest excerpt of a single chunk placed into the prompt, in chars.
pub const MAX_CHUNK_CHARS: usize = 1200;

const SCHEMA: &str = r#"{
  "pathways": [
    {
      "name": "string",
      "description": "string",
      "genes": ["GENE1", "GENE2"],
      "confidence": 0.0,
      "category": "Oncology|Signaling|Immunology|Inflammation|Cell Cycle|DNA Repair|Other"
    }
  ],
  "targets": [
    {
      "name": "string",
      "type": "string",
      "description": "string",
      "druggability": "High|Medium|Low",
      "knownDrugs": ["DrugA"],
      "pathways": ["Pathway Name"]
    }
  ],
  "hypothesis": {
    "summary": "1-2 sentences",
    "mechanism": "Mechanistic explanation",
    "intervention": "Testable intervention idea",
    "validation": "Wet-lab validation suggestion",
    "confidence": 0.0
  }
}"#;

const STRICT_SUFFIX: &str = "\nYour previous reply could not be used. Reply with a single JSON object that matches the schema above. \
Do not wrap it in markdown fences and do not write anything before or after it. \
Include at least one pathway or one target.\n";

/// Build the generation prompt. `strict` is set on retries after a reply
/// that failed validation.
pub fn build_prompt(request: &GenerationRequest<'_>, strict: bool) -> String {
    let q = request.query;
    let mut out = String::new();
    out.push_str("You are KDense AI Researcher, an oncology drug-discovery research assistant.\n");
    out.push_str("Task: extract pathways, gene targets and a concise mechanistic hypothesis for the question below, ");
    out.push_str("grounded in the retrieved literature.\n");
    if let Some(drug) = &q.drug { let _ = writeln!(out, "Drug context: {drug}"); }
    if let Some(cancer) = &q.cancer_type { let _ = writeln!(out, "Cancer context: {cancer}"); }
    out.push_str("\nReturn ONLY valid JSON (no markdown, no commentary) with this exact schema:\n");
    out.push_str(SCHEMA);
    out.push_str("\n\nRules:\n");
    out.push_str("- Provide 3-8 pathways and 3-8 targets when evidence supports them.\n");
    out.push_str("- Confidence values must be between 0 and 1.\n");
    out.push_str("- Use uppercase gene symbols where possible.\n");
    out.push_str("- Keep target and pathway names human-readable.\n");
    out.push_str("- Ground claims in the retrieved context; say so in the hypothesis when it is thin.\n\n");
    let _ = write!(out, "User question:\n{}\n\n", q.query);

    out.push_str("Planned tool calls (not executed):\n");
    if request.plan.is_empty() {
        out.push_str("(none)\n");
    }
    for step in &request.plan.steps {
        let _ = writeln!(out, "- {} ({})", step.tool, step.rationale);
    }

    out.push_str("\nRetrieved context:\n");
    if request.context.is_empty() {
        out.push_str("(no local literature matched)\n");
    }
    for (i, entry) in request.context.iter().enumerate() {
        let excerpt: String = entry.chunk.text.chars().take(MAX_CHUNK_CHARS).collect();
        let _ = write!(out, "[RAG:{}] source={}\n{}\n\n", i + 1, entry.chunk.source, excerpt);
    }
    if strict { out.push_str(STRICT_SUFFIX); }
    out
}
