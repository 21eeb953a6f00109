//! Configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `KDENSE_*` env
//! vars (nested keys separated by `__`, e.g. `KDENSE_PROVIDER__API_KEY`).
//! Everything is resolved once into a typed [`Settings`] value that callers
//! pass around by reference.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::Error;
use crate::response::ProviderKind;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("KDENSE_").split("__"));

        Ok(Self { figment })
    }

    /// Wrap an already assembled figment, e.g. one built from strings in tests.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::new().merge(Serialized::defaults(Settings::default())).merge(figment) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the full settings tree.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub docs: DocsSettings,
    pub retrieval: RetrievalSettings,
    pub provider: ProviderSettings,
    pub catalog: CatalogSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        if self.docs.chunk_size_chars == 0 {
            return Err(Error::InvalidConfig("docs.chunk_size_chars must be positive".into()));
        }
        if self.docs.overlap_chars >= self.docs.chunk_size_chars {
            return Err(Error::InvalidConfig(format!(
                "docs.overlap_chars ({}) must be smaller than docs.chunk_size_chars ({})",
                self.docs.overlap_chars, self.docs.chunk_size_chars
            )));
        }
        if self.provider.max_attempts == 0 {
            return Err(Error::InvalidConfig("provider.max_attempts must be at least 1".into()));
        }
        if self.provider.timeout_secs == 0 {
            return Err(Error::InvalidConfig("provider.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsSettings {
    pub dir: String,
    /// Descend into subdirectories. Off by default: only the top level is read.
    pub recursive: bool,
    pub chunk_size_chars: usize,
    pub overlap_chars: usize,
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self { dir: "./data/literature".to_string(), recursive: false, chunk_size_chars: 1500, overlap_chars: 250 }
    }
}

impl DocsSettings {
    pub fn dir_path(&self) -> PathBuf { expand_path(&self.dir) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Cosine,
    Bm25,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub scorer: ScorerKind,
}

impl Default for RetrievalSettings {
    fn default() -> Self { Self { top_k: 6, scorer: ScorerKind::Cosine } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Total calls allowed per query when the backend returns malformed output.
    pub max_attempts: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self { kind: ProviderKind::Stub, endpoint: None, model: None, api_key: None, timeout_secs: 60, max_attempts: 3 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Replaces the built-in catalog when set.
    pub path: Option<String>,
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
