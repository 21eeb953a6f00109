use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use kdense_core::config::Settings;
use kdense_core::error::{DocumentStoreError, Error, ValidationError};
use kdense_core::response::AgentResponse;
use kdense_core::snapshot::SnapshotHandle;
use kdense_core::store::{DocumentStore, LoadOptions};
use kdense_core::tooling::ToolSummary;
use kdense_core::traits::Retriever;
use kdense_core::types::{AgentQuery, RetrievedContext};
use kdense_provider::{GenerationRequest, Provider};
use kdense_text::CosineRetriever;
use kdense_tools::{ToolCatalog, ToolPlanner};

use crate::stage::{Stage, Trail};
use crate::validate_response;

pub const DEFAULT_TOP_K: usize = 6;

/// Outcome of one run plus the stages it passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub stages: Vec<Stage>,
    pub outcome: Result<AgentResponse, ValidationError>,
}

/// Runs one query through retrieval, planning, generation and validation.
///
/// Shared read-only across threads; the only mutable piece is the document
/// snapshot, which is swapped whole on reload.
pub struct Orchestrator {
    snapshot: SnapshotHandle,
    load_options: LoadOptions,
    retriever: Box<dyn Retriever>,
    catalog: Arc<ToolCatalog>,
    planner: ToolPlanner,
    provider: Provider,
    top_k: usize,
}

impl Orchestrator {
    pub fn new(snapshot: SnapshotHandle, catalog: Arc<ToolCatalog>, provider: Provider) -> Self {
        Self {
            snapshot,
            load_options: LoadOptions::default(),
            retriever: Box::new(CosineRetriever::new()),
            catalog,
            planner: ToolPlanner::new(),
            provider,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_retriever(mut self, retriever: Box<dyn Retriever>) -> Self {
        self.retriever = retriever;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_load_options(mut self, options: LoadOptions) -> Self {
        self.load_options = options;
        self
    }

    /// Build everything from resolved settings: load the document folder,
    /// the tool catalog and the provider. An unusable document folder leaves
    /// the store empty; configuration and catalog errors are returned.
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        let options = LoadOptions::from_settings(&settings.docs)?;
        let dir = settings.docs.dir_path();
        let store = match DocumentStore::load(&dir, &options) {
            Ok(store) => store,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "document folder unusable; answering without local literature");
                DocumentStore::empty()
            }
        };
        let catalog_path = settings.catalog.path.as_deref().map(kdense_core::config::expand_path);
        let catalog = ToolCatalog::load(catalog_path.as_deref())?;
        info!(
            documents = store.documents().len(),
            chunks = store.chunks().len(),
            tools = catalog.len(),
            scorer = ?settings.retrieval.scorer,
            "orchestrator ready"
        );
        Ok(Self::new(SnapshotHandle::new(store), Arc::new(catalog), Provider::from_settings(&settings.provider))
            .with_retriever(kdense_text::retriever_for(settings.retrieval.scorer))
            .with_top_k(settings.retrieval.top_k)
            .with_load_options(options))
    }

    pub fn provider(&self) -> &Provider { &self.provider }

    pub fn catalog(&self) -> &ToolCatalog { &self.catalog }

    pub fn documents(&self) -> Arc<DocumentStore> { self.snapshot.snapshot() }

    pub fn list_tools(&self, profile: Option<&str>) -> Vec<ToolSummary> { self.catalog.summaries(profile) }

    /// Replace the document snapshot with the contents of `dir`. Runs already
    /// in flight keep the snapshot they started with.
    pub fn reload_documents(&self, dir: &Path) -> Result<usize, DocumentStoreError> { self.snapshot.reload(dir, &self.load_options) }

    pub fn run(&self, query: &AgentQuery) -> Result<AgentResponse, ValidationError> { self.run_traced(query).outcome }

    pub fn run_traced(&self, query: &AgentQuery) -> RunReport {
        let mut trail = Trail::new();

        trail.enter(Stage::Retrieving);
        let store = self.snapshot.snapshot();
        let context = match self.retriever.retrieve(&query.query, store.chunks(), self.top_k) {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!(retriever = self.retriever.name(), error = %e, "retrieval failed; continuing without context");
                RetrievedContext::empty()
            }
        };

        trail.enter(Stage::Planning);
        let tools = self.catalog.list(query.tool_profile.as_deref());
        let plan = self.planner.plan(query, &tools);

        trail.enter(Stage::Generating);
        let generation = self.provider.generate(&GenerationRequest { query, context: &context, plan: &plan });

        trail.enter(Stage::Validating);
        let response = AgentResponse {
            text: generation.text,
            answer: generation.answer,
            tool_plan: plan,
            context,
            provenance: generation.provenance,
            valid: generation.valid,
        };
        let outcome = match validate_response(&response) {
            Ok(()) => {
                trail.enter(Stage::Done);
                info!(
                    origin = ?response.provenance.origin,
                    provider = %response.provenance.provider,
                    chunks = response.context.len(),
                    tools = response.tool_plan.len(),
                    "query answered"
                );
                Ok(response)
            }
            Err(e) => {
                trail.enter(Stage::Failed);
                warn!(error = %e, "response failed validation");
                Err(e)
            }
        };
        RunReport { stages: trail.into_stages(), outcome }
    }
}
