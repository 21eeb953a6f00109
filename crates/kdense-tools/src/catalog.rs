//! Versioned, read-only registry of tool descriptors.

use std::collections::BTreeSet;
use std::path::Path;

use figment::providers::{Format, Toml};
use figment::Figment;
use serde::Deserialize;
use tracing::info;

use kdense_core::error::Error;
use kdense_core::tooling::{ToolDescriptor, ToolSummary};

const BUILTIN_CATALOG: &str = include_str!("../catalog/drug_discovery.toml");

#[derive(Debug, Deserialize)]
struct CatalogDef {
    version: u32,
    #[serde(default)]
    tools: Vec<ToolDescriptor>,
}

/// Loaded once at startup and never mutated; listing is a pure projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCatalog {
    version: u32,
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    /// The drug-discovery catalog compiled into the binary.
    pub fn builtin() -> Result<Self, Error> { Self::from_toml_str(BUILTIN_CATALOG) }

    pub fn from_toml_str(src: &str) -> Result<Self, Error> {
        let def: CatalogDef = Figment::from(Toml::string(src))
            .extract()
            .map_err(|e| Error::InvalidConfig(format!("tool catalog: {e}")))?;
        Self::new(def.version, def.tools)
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        if !path.is_file() { return Err(Error::NotFound(format!("tool catalog {}", path.display()))); }
        let src = std::fs::read_to_string(path).map_err(|e| Error::Operation(format!("reading {}: {e}", path.display())))?;
        let catalog = Self::from_toml_str(&src)?;
        info!(path = %path.display(), version = catalog.version, tools = catalog.tools.len(), "tool catalog loaded");
        Ok(catalog)
    }

    /// Builtin catalog unless `path` names a replacement file.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    pub fn new(version: u32, tools: Vec<ToolDescriptor>) -> Result<Self, Error> {
        let mut seen = BTreeSet::new();
        for t in &tools {
            if t.name.trim().is_empty() { return Err(Error::InvalidConfig("tool catalog: tool with empty name".into())); }
            if !seen.insert(t.name.as_str()) {
                return Err(Error::InvalidConfig(format!("tool catalog: duplicate tool name '{}'", t.name)));
            }
        }
        Ok(Self { version, tools })
    }

    pub fn version(&self) -> u32 { self.version }

    /// Tools in catalog order. `None` lists everything; an unknown profile
    /// lists nothing.
    pub fn list(&self, profile: Option<&str>) -> Vec<&ToolDescriptor> {
        match profile {
            None => self.tools.iter().collect(),
            Some(p) => self.tools.iter().filter(|t| t.profile.as_deref() == Some(p)).collect(),
        }
    }

    pub fn summaries(&self, profile: Option<&str>) -> Vec<ToolSummary> {
        self.list(profile).into_iter().map(ToolDescriptor::summary).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> { self.tools.iter().find(|t| t.name == name) }

    /// Distinct profile names in first-seen order.
    pub fn profiles(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for p in self.tools.iter().filter_map(|t| t.profile.as_deref()) {
            if !out.contains(&p) { out.push(p); }
        }
        out
    }

    pub fn len(&self) -> usize { self.tools.len() }

    pub fn is_empty(&self) -> bool { self.tools.is_empty() }
}
