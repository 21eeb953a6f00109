use std::collections::BTreeMap;

use kdense_core::tooling::{SelectionRationale, ToolDescriptor};
use kdense_core::types::AgentQuery;
use kdense_tools::{ToolCatalog, ToolPlanner};

fn tool(name: &str, tags: &[&str], profile: Option<&str>) -> ToolDescriptor {
    ToolDescriptor {
        name: name.into(),
        purpose: String::new(),
        capability_tags: tags.iter().map(|t| (*t).to_string()).collect(),
        profile: profile.map(str::to_string),
        input_schema: BTreeMap::new(),
    }
}

#[test]
fn single_chembl_tool_is_selected_by_keyword() {
    let catalog = ToolCatalog::new(1, vec![tool("chembl.lookup", &["chembl"], Some("chembl"))]).unwrap();
    let plan = ToolPlanner::new().plan(&AgentQuery::new("chembl target lookup for cisplatin"), &catalog.list(None));

    assert_eq!(plan.tool_names(), vec!["chembl.lookup"]);
    assert_eq!(plan.steps[0].rationale, SelectionRationale::KeywordMatch { tag: "chembl".into() });
}

#[test]
fn no_match_is_an_empty_plan() {
    let catalog = ToolCatalog::new(1, vec![tool("chembl.lookup", &["chembl"], None)]).unwrap();
    let plan = ToolPlanner::new().plan(&AgentQuery::new("weather in Lisbon"), &catalog.list(None));
    assert!(plan.is_empty());
}

#[test]
fn drug_hint_selects_tools_declaring_drug_relevance() {
    let catalog = ToolCatalog::new(
        1,
        vec![tool("a.compound", &["compound"], None), tool("b.network", &["network"], None), tool("c.platinum", &["cisplatin"], None)],
    )
    .unwrap();
    let q = AgentQuery::new("what drives resistance").with_drug("cisplatin");
    let plan = ToolPlanner::new().plan(&q, &catalog.list(None));

    assert_eq!(plan.tool_names(), vec!["a.compound", "c.platinum"]);
    assert_eq!(plan.steps[0].rationale, SelectionRationale::DrugHint { tag: "compound".into() });
    assert_eq!(plan.steps[1].rationale, SelectionRationale::DrugHint { tag: "cisplatin".into() });
}

#[test]
fn cancer_type_hint_selects_disease_tools() {
    let catalog = ToolCatalog::new(1, vec![tool("a.disease", &["disease"], None), tool("b.assay", &["assay"], None)]).unwrap();
    let q = AgentQuery::new("mechanisms").with_cancer_type("NSCLC");
    let plan = ToolPlanner::new().plan(&q, &catalog.list(None));
    assert_eq!(plan.tool_names(), vec!["a.disease"]);
    assert!(matches!(plan.steps[0].rationale, SelectionRationale::CancerTypeHint { .. }));
}

#[test]
fn keyword_match_takes_precedence_over_hints() {
    let catalog = ToolCatalog::new(1, vec![tool("a", &["compound", "target"], None)]).unwrap();
    let q = AgentQuery::new("target lookup").with_drug("cisplatin");
    let plan = ToolPlanner::new().plan(&q, &catalog.list(None));
    assert_eq!(plan.steps[0].rationale, SelectionRationale::KeywordMatch { tag: "target".into() });
}

#[test]
fn plan_follows_catalog_order() {
    let catalog = ToolCatalog::builtin().unwrap();
    let plan = ToolPlanner::new().plan(&AgentQuery::new("pathway and target evidence"), &catalog.list(None));
    let order: Vec<usize> = plan
        .steps
        .iter()
        .map(|s| catalog.list(None).iter().position(|t| t.name == s.tool).unwrap())
        .collect();
    assert!(!order.is_empty());
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn builtin_catalog_plan_for_cisplatin_resistance() {
    let catalog = ToolCatalog::builtin().unwrap();
    let q = AgentQuery::new("cisplatin resistance mechanisms").with_drug("cisplatin").with_cancer_type("NSCLC");
    let plan = ToolPlanner::new().plan(&q, &catalog.list(Some("chembl")));

    let names = plan.tool_names();
    assert!(names.contains(&"chembl.search_compounds"));
    assert!(names.contains(&"chembl.get_mechanism_of_action"));
    assert!(names.contains(&"chembl.search_target_diseases"));
    assert!(!names.contains(&"chembl.search_by_uniprot"));

    let search = plan.steps.iter().find(|s| s.tool == "chembl.search_compounds").unwrap();
    assert_eq!(search.arguments.get("query").map(String::as_str), Some("cisplatin"));
    assert!(search.unresolved.is_empty());
}

#[test]
fn planning_twice_is_identical() {
    let catalog = ToolCatalog::builtin().unwrap();
    let q = AgentQuery::new("EGFR pathway enrichment").with_drug("erlotinib");
    let planner = ToolPlanner::new();
    assert_eq!(planner.plan(&q, &catalog.list(None)), planner.plan(&q, &catalog.list(None)));
}

#[test]
fn literature_and_dataset_queries_combine_hints_with_question() {
    let catalog = ToolCatalog::builtin().unwrap();
    let q = AgentQuery::new("resistance mechanisms").with_drug("cisplatin").with_cancer_type("NSCLC");
    let planner = ToolPlanner::new();

    let pubmed = planner.plan(&q, &catalog.list(Some("pubmed")));
    let search = pubmed.steps.iter().find(|s| s.tool == "pubmed.search").unwrap();
    assert_eq!(search.arguments.get("query").map(String::as_str), Some("cisplatin NSCLC resistance mechanisms"));

    let geo = planner.plan(&q, &catalog.list(Some("geo")));
    let series = geo.steps.iter().find(|s| s.tool == "geo.search_series").unwrap();
    assert_eq!(series.arguments.get("query").map(String::as_str), Some("cisplatin NSCLC resistance mechanisms"));
    assert_eq!(series.arguments.get("organism").map(String::as_str), Some("Homo sapiens"));
}
