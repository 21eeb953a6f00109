//! Maps a query and its structured hints onto catalog tools.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use kdense_core::tooling::{PlannedTool, SelectionRationale, ToolDescriptor, ToolPlan};
use kdense_core::types::AgentQuery;
use kdense_text::Analyzer;

/// Tags through which a tool declares it wants a drug name.
pub const DRUG_HINT_TAGS: [&str; 2] = ["drug", "compound"];
/// Tags through which a tool declares it wants a cancer type.
pub const CANCER_HINT_TAGS: [&str; 2] = ["cancer", "disease"];

/// Tools searching free text (literature, datasets) get the question plus
/// hints as their query instead of the bare drug name.
pub const COMPOSED_QUERY_TAGS: [&str; 2] = ["literature", "dataset"];

const DEFAULT_ORGANISM: &str = "Homo sapiens";

#[derive(Debug, Clone, Default)]
pub struct ToolPlanner {
    analyzer: Analyzer,
}

struct QueryTerms {
    text: BTreeSet<String>,
    drug: Option<BTreeSet<String>>,
    cancer: Option<BTreeSet<String>>,
}

impl ToolPlanner {
    pub fn new() -> Self { Self::default() }

    fn terms(&self, text: &str) -> BTreeSet<String> { self.analyzer.tokens(text).into_iter().collect() }

    /// Select the tools that apply to `query`, in `catalog` order.
    ///
    /// Pure: the planner decides which tools would apply and binds what it
    /// can from the query; it never runs anything.
    pub fn plan(&self, query: &AgentQuery, catalog: &[&ToolDescriptor]) -> ToolPlan {
        let terms = QueryTerms {
            text: self.terms(&query.query),
            drug: query.drug.as_deref().map(|d| self.terms(d)),
            cancer: query.cancer_type.as_deref().map(|c| self.terms(c)),
        };
        let mut steps = Vec::new();
        for tool in catalog {
            let Some(rationale) = self.select(tool, &terms) else { continue };
            let (arguments, unresolved) = bind_arguments(tool, query);
            debug!(tool = %tool.name, %rationale, "tool selected");
            steps.push(PlannedTool { tool: tool.name.clone(), rationale, arguments, unresolved });
        }
        ToolPlan { steps }
    }

    fn select(&self, tool: &ToolDescriptor, terms: &QueryTerms) -> Option<SelectionRationale> {
        let tags: Vec<(&String, BTreeSet<String>)> = tool.capability_tags.iter().map(|t| (t, self.terms(t))).collect();
        let covered = |tag_terms: &BTreeSet<String>, pool: &BTreeSet<String>| !tag_terms.is_empty() && tag_terms.is_subset(pool);

        if let Some((tag, _)) = tags.iter().find(|(_, tt)| covered(tt, &terms.text)) {
            return Some(SelectionRationale::KeywordMatch { tag: (*tag).clone() });
        }
        if let Some(drug) = &terms.drug {
            let hit = tags.iter().find(|(tag, tt)| DRUG_HINT_TAGS.contains(&tag.as_str()) || covered(tt, drug));
            if let Some((tag, _)) = hit { return Some(SelectionRationale::DrugHint { tag: (*tag).clone() }); }
        }
        if let Some(cancer) = &terms.cancer {
            let hit = tags.iter().find(|(tag, tt)| CANCER_HINT_TAGS.contains(&tag.as_str()) || covered(tt, cancer));
            if let Some((tag, _)) = hit { return Some(SelectionRationale::CancerTypeHint { tag: (*tag).clone() }); }
        }
        None
    }
}

/// Bind the inputs that follow directly from the query; report every other
/// required input as unresolved.
fn bind_arguments(tool: &ToolDescriptor, query: &AgentQuery) -> (BTreeMap<String, String>, Vec<String>) {
    let mut arguments = BTreeMap::new();
    for field in tool.input_schema.keys() {
        let value = match field.as_str() {
            "query" if COMPOSED_QUERY_TAGS.iter().any(|t| tool.capability_tags.contains(*t)) => Some(composed_query(query)),
            "query" => Some(query.drug.clone().unwrap_or_else(|| query.query.clone())),
            "drug_name" | "compound" => query.drug.clone(),
            "cancer_type" | "disease_or_pathway" => query.cancer_type.clone(),
            "organism" | "species" => Some(DEFAULT_ORGANISM.to_string()),
            _ => None,
        };
        if let Some(v) = value { arguments.insert(field.clone(), v); }
    }
    let unresolved = tool.required_inputs().filter(|f| !arguments.contains_key(*f)).map(str::to_string).collect();
    (arguments, unresolved)
}

/// Hints not already mentioned in the question, followed by the question.
fn composed_query(query: &AgentQuery) -> String {
    let question = query.query.trim();
    let lower = question.to_lowercase();
    let mut parts: Vec<&str> = [query.drug.as_deref(), query.cancer_type.as_deref()]
        .into_iter()
        .flatten()
        .filter(|h| !lower.contains(&h.to_lowercase()))
        .collect();
    if !question.is_empty() { parts.push(question); }
    parts.join(" ")
}
