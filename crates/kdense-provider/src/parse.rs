//! Turns raw completion text into a `StructuredAnswer`.
//!
//! Backends rarely follow a schema exactly, so parsing is lenient about
//! shape (missing fields get placeholders, out-of-range numbers are clamped)
//! and strict about substance: an answer with neither a pathway nor a target
//! is rejected.

use serde_json::{Map, Value};
use thiserror::Error;

use kdense_core::answer::{Druggability, Hypothesis, Pathway, StructuredAnswer, Target};

pub const MAX_PATHWAYS: usize = 8;
pub const MAX_TARGETS: usize = 8;
pub const MAX_GENES: usize = 12;

const DEFAULT_PATHWAY_CONFIDENCE: f64 = 0.6;
const DEFAULT_HYPOTHESIS_CONFIDENCE: f64 = 0.5;
const NO_DESCRIPTION: &str = "No description provided.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty completion")]
    Empty,
    #[error("no JSON object found in completion")]
    NotJson,
    #[error("completion names no pathways and no targets")]
    NoContent,
}

/// Parse and normalize a completion.
pub fn parse_structured(raw: &str) -> Result<StructuredAnswer, ParseError> {
    let obj = extract_object(raw)?;
    let answer = normalize(&obj);
    if !answer.has_content() { return Err(ParseError::NoContent); }
    Ok(answer)
}

/// The whole text as a JSON object, else the span between the first `{` and
/// the last `}`.
fn extract_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    let text = raw.trim();
    if text.is_empty() { return Err(ParseError::Empty); }
    if let Ok(Value::Object(m)) = serde_json::from_str(text) { return Ok(m); }
    let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) else { return Err(ParseError::NotJson) };
    if last <= first { return Err(ParseError::NotJson); }
    match serde_json::from_str(&text[first..=last]) {
        Ok(Value::Object(m)) => Ok(m),
        _ => Err(ParseError::NotJson),
    }
}

fn normalize(obj: &Map<String, Value>) -> StructuredAnswer {
    let pathways = objects(obj.get("pathways")).filter_map(pathway).take(MAX_PATHWAYS).collect();
    let targets = objects(obj.get("targets")).filter_map(target).take(MAX_TARGETS).collect();
    let empty = Map::new();
    let h = obj.get("hypothesis").and_then(Value::as_object).unwrap_or(&empty);
    let hypothesis = Hypothesis {
        summary: text_or(h.get("summary"), "Insufficient evidence for a concise hypothesis."),
        mechanism: text_or(h.get("mechanism"), "No mechanism provided."),
        intervention: text_or(h.get("intervention"), "No intervention suggested."),
        validation: text_or(h.get("validation"), "No validation plan provided."),
        confidence: confidence(h.get("confidence"), DEFAULT_HYPOTHESIS_CONFIDENCE),
    };
    StructuredAnswer { pathways, targets, hypothesis }
}

fn pathway(p: &Map<String, Value>) -> Option<Pathway> {
    let name = text(p.get("name"));
    if name.is_empty() { return None; }
    Some(Pathway {
        name,
        description: text_or(p.get("description"), NO_DESCRIPTION),
        genes: strings(p.get("genes")).into_iter().map(|g| g.to_uppercase()).take(MAX_GENES).collect(),
        confidence: confidence(p.get("confidence"), DEFAULT_PATHWAY_CONFIDENCE),
        category: text_or(p.get("category"), "Other"),
    })
}

fn target(t: &Map<String, Value>) -> Option<Target> {
    let name = text(t.get("name"));
    if name.is_empty() { return None; }
    Some(Target {
        name,
        kind: text_or(t.get("type"), "Target"),
        description: text_or(t.get("description"), NO_DESCRIPTION),
        druggability: Druggability::parse_lenient(&text(t.get("druggability"))),
        known_drugs: strings(t.get("knownDrugs")),
        pathways: strings(t.get("pathways")),
    })
}

fn objects(v: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    v.and_then(Value::as_array).into_iter().flatten().filter_map(Value::as_object)
}

/// Scalars as trimmed text; anything else is empty.
fn text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn text_or(v: Option<&Value>, placeholder: &str) -> String {
    let s = text(v);
    if s.is_empty() { placeholder.to_string() } else { s }
}

fn strings(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|x| text(Some(x)))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Missing means `default`; present but not a number means 0.5; numbers are
/// clamped to [0, 1].
fn confidence(v: Option<&Value>, default: f64) -> f64 {
    let x = match v {
        None | Some(Value::Null) => return default,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match x {
        Some(x) if x.is_finite() => x.clamp(0.0, 1.0),
        _ => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_json_is_normalized() {
        let raw = r#"{
            "pathways": [{"name": " EGFR signalling ", "genes": ["egfr", "", "kras"], "confidence": 1.7}],
            "targets": [{"name": "EGFR", "druggability": "high", "knownDrugs": ["erlotinib"]}],
            "hypothesis": {"summary": "EGFR drives it", "confidence": -2}
        }"#;
        let a = parse_structured(raw).expect("parse");
        assert_eq!(a.pathways[0].name, "EGFR signalling");
        assert_eq!(a.pathways[0].genes, vec!["EGFR", "KRAS"]);
        assert_eq!(a.pathways[0].confidence, 1.0);
        assert_eq!(a.pathways[0].category, "Other");
        assert_eq!(a.pathways[0].description, NO_DESCRIPTION);
        assert_eq!(a.targets[0].druggability, Druggability::High);
        assert_eq!(a.targets[0].kind, "Target");
        assert_eq!(a.hypothesis.confidence, 0.0);
        assert_eq!(a.hypothesis.mechanism, "No mechanism provided.");
    }

    #[test]
    fn json_wrapped_in_prose_is_recovered() {
        let raw = "Sure! Here you go:\n```json\n{\"targets\": [{\"name\": \"ERCC1\"}]}\n```";
        let a = parse_structured(raw).expect("parse");
        assert_eq!(a.targets[0].name, "ERCC1");
        assert!(a.pathways.is_empty());
        assert_eq!(a.hypothesis.confidence, DEFAULT_HYPOTHESIS_CONFIDENCE);
    }

    #[test]
    fn rejects_empty_prose_and_contentless() {
        assert_eq!(parse_structured("  "), Err(ParseError::Empty));
        assert_eq!(parse_structured("I cannot help with that."), Err(ParseError::NotJson));
        assert_eq!(parse_structured("} nope {"), Err(ParseError::NotJson));
        assert_eq!(parse_structured(r#"{"pathways": [], "targets": [{"name": ""}]}"#), Err(ParseError::NoContent));
        assert_eq!(parse_structured("[1, 2, 3]"), Err(ParseError::NotJson));
    }

    #[test]
    fn lists_are_capped() {
        let pathways: Vec<String> = (0..12).map(|i| format!(r#"{{"name": "p{i}"}}"#)).collect();
        let genes: Vec<String> = (0..20).map(|i| format!("\"g{i}\"")).collect();
        let raw = format!(
            r#"{{"pathways": [{}], "targets": [{{"name": "t", "pathways": ["x"]}}], "hypothesis": {{}}, "extra": [{}]}}"#,
            pathways.join(","),
            genes.join(",")
        );
        let a = parse_structured(&raw).expect("parse");
        assert_eq!(a.pathways.len(), MAX_PATHWAYS);
        assert_eq!(a.pathways[0].confidence, DEFAULT_PATHWAY_CONFIDENCE);

        let raw = format!(r#"{{"pathways": [{{"name": "p", "genes": [{}]}}]}}"#, genes.join(","));
        assert_eq!(parse_structured(&raw).expect("parse").pathways[0].genes.len(), MAX_GENES);
    }

    #[test]
    fn non_numeric_confidence_is_midpoint() {
        let a = parse_structured(r#"{"pathways": [{"name": "p", "confidence": "high"}], "hypothesis": {"confidence": "0.8"}}"#)
            .expect("parse");
        assert_eq!(a.pathways[0].confidence, 0.5);
        assert_eq!(a.hypothesis.confidence, 0.8);
    }
}
