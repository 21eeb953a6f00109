use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Raised by `DocumentStore::load` when the document directory itself cannot
/// be used. Individual bad files never produce this error.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("Document path {} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Document directory {} is not readable: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The only failure a caller of the orchestrator can observe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Response text is empty")]
    EmptyText,

    #[error("Response was not marked as structurally valid")]
    NotValidated,

    #[error("Malformed provenance: {0}")]
    MalformedProvenance(String),
}
