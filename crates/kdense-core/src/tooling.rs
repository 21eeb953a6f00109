//! Tool descriptors and the plans built from them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    StringList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub required: bool,
}

/// A callable external tool as declared in the catalog definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub capability_tags: BTreeSet<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub input_schema: BTreeMap<String, InputField>,
}

impl ToolDescriptor {
    pub fn required_inputs(&self) -> impl Iterator<Item = &str> {
        self.input_schema.iter().filter(|(_, f)| f.required).map(|(k, _)| k.as_str())
    }

    pub fn summary(&self) -> ToolSummary {
        ToolSummary { name: self.name.clone(), capability_tags: self.capability_tags.clone(), profile: self.profile.clone() }
    }
}

/// Read-only projection returned by the tool listing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub capability_tags: BTreeSet<String>,
    pub profile: Option<String>,
}

/// Why the planner selected a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionRationale {
    KeywordMatch { tag: String },
    DrugHint { tag: String },
    CancerTypeHint { tag: String },
}

impl std::fmt::Display for SelectionRationale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeywordMatch { tag } => write!(f, "keyword match on '{tag}'"),
            Self::DrugHint { tag } => write!(f, "drug hint matches '{tag}'"),
            Self::CancerTypeHint { tag } => write!(f, "cancer-type hint matches '{tag}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTool {
    /// Name of the selected `ToolDescriptor`.
    pub tool: String,
    pub rationale: SelectionRationale,
    /// Inputs that could be bound from the query and its hints.
    pub arguments: BTreeMap<String, String>,
    /// Required inputs the external tool runtime still has to resolve.
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPlan {
    pub steps: Vec<PlannedTool>,
}

impl ToolPlan {
    pub fn empty() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.steps.len() }

    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    pub fn tool_names(&self) -> Vec<&str> { self.steps.iter().map(|s| s.tool.as_str()).collect() }
}
