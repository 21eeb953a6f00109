//! The structured fields every generated answer must decompose into.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Druggability {
    High,
    Medium,
    Low,
}

impl Druggability {
    /// Case-insensitive parse; anything unrecognised is `Medium`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub name: String,
    pub description: String,
    pub genes: Vec<String>,
    pub confidence: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub druggability: Druggability,
    #[serde(rename = "knownDrugs")]
    pub known_drugs: Vec<String>,
    pub pathways: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub summary: String,
    pub mechanism: String,
    pub intervention: String,
    pub validation: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub pathways: Vec<Pathway>,
    pub targets: Vec<Target>,
    pub hypothesis: Hypothesis,
}

impl StructuredAnswer {
    /// An answer carries content when it names at least one pathway or target.
    pub fn has_content(&self) -> bool { !self.pathways.is_empty() || !self.targets.is_empty() }
}
