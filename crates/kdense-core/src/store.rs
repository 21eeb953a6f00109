//! Loading `.txt`/`.md` documents from a directory and splitting them into
//! overlapping character windows.

use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use twox_hash::XxHash64;

use crate::config::DocsSettings;
use crate::error::{DocumentStoreError, Error};
use crate::types::{Chunk, Document};

const DOCUMENT_EXTENSIONS: [&str; 2] = ["txt", "md"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    chunk_size_chars: usize,
    overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self { Self { chunk_size_chars: 1500, overlap_chars: 250 } }
}

impl ChunkingConfig {
    pub fn new(chunk_size_chars: usize, overlap_chars: usize) -> Result<Self, Error> {
        if chunk_size_chars == 0 || overlap_chars >= chunk_size_chars {
            return Err(Error::InvalidConfig(format!(
                "chunk size ({chunk_size_chars}) must be positive and larger than overlap ({overlap_chars})"
            )));
        }
        Ok(Self { chunk_size_chars, overlap_chars })
    }

    pub fn chunk_size_chars(&self) -> usize { self.chunk_size_chars }

    pub fn overlap_chars(&self) -> usize { self.overlap_chars }

    fn step(&self) -> usize { self.chunk_size_chars - self.overlap_chars }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub chunking: ChunkingConfig,
    /// When false (the default) only files directly inside the directory are read.
    pub recursive: bool,
}

impl LoadOptions {
    pub fn from_settings(docs: &DocsSettings) -> Result<Self, Error> {
        Ok(Self { chunking: ChunkingConfig::new(docs.chunk_size_chars, docs.overlap_chars)?, recursive: docs.recursive })
    }
}

/// An immutable snapshot of loaded documents and their chunks.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    chunks: Vec<Chunk>,
}

impl DocumentStore {
    pub fn empty() -> Self { Self::default() }

    /// Load every readable, non-empty `.txt`/`.md` file under `dir`.
    ///
    /// A missing directory yields an empty store. Files that cannot be read
    /// or contain only whitespace are logged and skipped.
    pub fn load(dir: &Path, options: &LoadOptions) -> Result<Self, DocumentStoreError> {
        if !dir.exists() {
            warn!(dir = %dir.display(), "document directory does not exist; using an empty store");
            return Ok(Self::empty());
        }
        if !dir.is_dir() {
            return Err(DocumentStoreError::NotADirectory { path: dir.to_path_buf() });
        }
        fs::read_dir(dir).map_err(|source| DocumentStoreError::Unreadable { path: dir.to_path_buf(), source })?;

        let files = list_document_files(dir, options.recursive);
        let mut documents = Vec::new();
        let mut chunks = Vec::new();
        for path in files {
            let text = match read_lossy(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable document");
                    continue;
                }
            };
            if text.trim().is_empty() {
                warn!(path = %path.display(), "skipping empty document");
                continue;
            }
            let relative = path.strip_prefix(dir).unwrap_or(path.as_path());
            let doc = Document {
                id: document_id(relative),
                source: path.to_string_lossy().to_string(),
                title: extract_title(&text, &path),
                text,
            };
            let doc_chunks = chunk_document(&doc, &options.chunking);
            debug!(doc = %doc.id, source = %doc.source, chunks = doc_chunks.len(), "loaded document");
            chunks.extend(doc_chunks);
            documents.push(doc);
        }
        info!(dir = %dir.display(), documents = documents.len(), chunks = chunks.len(), "document store loaded");
        Ok(Self { documents, chunks })
    }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn chunks(&self) -> &[Chunk] { &self.chunks }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

/// Stable identity for a document: xxHash64 of its `/`-separated relative path.
pub fn document_id(relative: &Path) -> String {
    let key = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/");
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(key.as_bytes());
    format!("doc-{:016x}", hasher.finish())
}

/// Split a document into windows of `chunk_size_chars` characters, each
/// starting `chunk_size_chars - overlap_chars` characters after the last.
/// Windows are trimmed; windows that are blank after trimming are dropped.
pub fn chunk_document(doc: &Document, config: &ChunkingConfig) -> Vec<Chunk> {
    let text = doc.text.as_str();
    let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let n_chars = bounds.len() - 1;
    let mut out = Vec::new();
    let mut start = 0;
    while start < n_chars {
        let end = (start + config.chunk_size_chars).min(n_chars);
        let window = &text[bounds[start]..bounds[end]];
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            let lead = window.len() - window.trim_start().len();
            let index = out.len();
            out.push(Chunk {
                id: format!("{}:{}", doc.id, index),
                doc_id: doc.id.clone(),
                source: doc.source.clone(),
                offset: bounds[start] + lead,
                index,
                text: trimmed.to_string(),
            });
        }
        if end == n_chars { break; }
        start += config.step();
    }
    out
}

fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).to_string(),
    })
}

fn extract_title(text: &str, path: &Path) -> String {
    let heading = text
        .lines()
        .map(str::trim)
        .find_map(|l| l.strip_prefix("# ").map(str::trim))
        .filter(|t| !t.is_empty());
    match heading {
        Some(h) => h.to_string(),
        None => path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default(),
    }
}

fn list_document_files(root: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() { continue; }
        let path = entry.path();
        let ext = path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase);
        if ext.as_deref().is_some_and(|e| DOCUMENT_EXTENSIONS.contains(&e)) { files.push(path.to_path_buf()); }
    }
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document { id: "doc-1".into(), source: "a.txt".into(), title: "a".into(), text: text.into() }
    }

    #[test]
    fn windows_overlap_by_configured_amount() {
        let cfg = ChunkingConfig::new(10, 3).expect("cfg");
        let chunks = chunk_document(&doc("abcdefghijklmnopqrstuvwxyz"), &cfg);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxyz"]);
        assert_eq!(chunks[1].offset, 7);
        assert_eq!(chunks[3].id, "doc-1:3");
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_document(&doc("  EGFR and KRAS  "), &ChunkingConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "EGFR and KRAS");
        assert_eq!(chunks[0].offset, 2);
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let cfg = ChunkingConfig::new(4, 1).expect("cfg");
        let chunks = chunk_document(&doc("αβγδεζηθ"), &cfg);
        assert_eq!(chunks[0].text, "αβγδ");
        assert_eq!(chunks[1].text, "δεζη");
    }

    #[test]
    fn overlap_not_smaller_than_size_is_rejected() {
        assert!(ChunkingConfig::new(5, 5).is_err());
        assert!(ChunkingConfig::new(0, 0).is_err());
    }

    #[test]
    fn title_prefers_markdown_heading() {
        assert_eq!(extract_title("intro\n# EGFR review\nbody", Path::new("x/paper.md")), "EGFR review");
        assert_eq!(extract_title("no heading", Path::new("x/paper.md")), "paper");
    }

    #[test]
    fn document_id_is_stable_and_path_sensitive() {
        let a = document_id(Path::new("reviews/egfr.md"));
        assert_eq!(a, document_id(Path::new("reviews/egfr.md")));
        assert_ne!(a, document_id(Path::new("reviews/egfr.txt")));
        assert!(a.starts_with("doc-"));
    }
}
