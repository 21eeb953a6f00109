use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use kdense_agent::Orchestrator;
use kdense_core::config::{Config, Settings};
use kdense_core::store::{DocumentStore, LoadOptions};
use kdense_core::types::AgentQuery;

#[derive(Parser)]
#[command(name = "kdense")]
#[command(about = "Literature-grounded oncology research assistant", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a research question against the local literature folder
    Ask {
        query: String,
        #[arg(long)]
        drug: Option<String>,
        #[arg(long)]
        cancer_type: Option<String>,
        /// Restrict tool planning to one catalog profile
        #[arg(long)]
        profile: Option<String>,
        /// Overrides docs.dir from configuration
        #[arg(long)]
        docs_dir: Option<PathBuf>,
        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalog tools
    Tools {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show what the document folder loads into
    Docs {
        #[arg(long)]
        docs_dir: Option<PathBuf>,
    },
}

fn settings_with(docs_dir: Option<&PathBuf>) -> anyhow::Result<Settings> {
    let mut settings = Config::load()?.settings()?;
    if let Some(dir) = docs_dir { settings.docs.dir = dir.display().to_string(); }
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ask { query, drug, cancer_type, profile, docs_dir, json } => {
            let settings = settings_with(docs_dir.as_ref())?;
            let orchestrator = Orchestrator::from_settings(&settings).context("failed to start orchestrator")?;
            let mut q = AgentQuery::new(query);
            if let Some(d) = drug { q = q.with_drug(d); }
            if let Some(c) = cancer_type { q = q.with_cancer_type(c); }
            if let Some(p) = profile { q = q.with_tool_profile(p); }

            let response = orchestrator.run(&q).context("response failed validation")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.text);
            }
        }
        Commands::Tools { profile, json } => {
            let settings = settings_with(None)?;
            let orchestrator = Orchestrator::from_settings(&settings)?;
            let tools = orchestrator.list_tools(profile.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else {
                println!("Tool catalog v{} ({} tools)", orchestrator.catalog().version(), tools.len());
                for t in &tools {
                    let tags: Vec<&str> = t.capability_tags.iter().map(String::as_str).collect();
                    println!("  {:<40} [{}] {}", t.name, t.profile.as_deref().unwrap_or("-"), tags.join(", "));
                }
            }
        }
        Commands::Docs { docs_dir } => {
            let settings = settings_with(docs_dir.as_ref())?;
            let dir = settings.docs.dir_path();
            let store = DocumentStore::load(&dir, &LoadOptions::from_settings(&settings.docs)?)?;
            info!(dir = %dir.display(), "document folder inspected");
            println!("{}: {} documents, {} chunks", dir.display(), store.documents().len(), store.chunks().len());
            for doc in store.documents() {
                let chunks = store.chunks().iter().filter(|c| c.doc_id == doc.id).count();
                println!("  {}  {}  \"{}\" ({} chunks, {} chars)", doc.id, doc.source, doc.title, chunks, doc.text.chars().count());
            }
        }
    }
    Ok(())
}
