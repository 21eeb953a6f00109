use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::error::DocumentStoreError;
use crate::store::{DocumentStore, LoadOptions};

/// Shared reference to the current `DocumentStore`.
///
/// Readers clone the inner `Arc` and work against that snapshot for the rest
/// of the query. A reload builds the replacement store first and only then
/// swaps the reference, so no reader ever sees a partially loaded store.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHandle {
    current: Arc<RwLock<Arc<DocumentStore>>>,
}

impl SnapshotHandle {
    pub fn new(store: DocumentStore) -> Self { Self { current: Arc::new(RwLock::new(Arc::new(store))) } }

    pub fn snapshot(&self) -> Arc<DocumentStore> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Swap in `store`, returning the snapshot it replaces.
    pub fn replace(&self, store: DocumentStore) -> Arc<DocumentStore> {
        let next = Arc::new(store);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Load `dir` and swap it in. On error the current snapshot stays in place.
    pub fn reload(&self, dir: &Path, options: &LoadOptions) -> Result<usize, DocumentStoreError> {
        let store = DocumentStore::load(dir, options)?;
        let n = store.documents().len();
        self.replace(store);
        info!(dir = %dir.display(), documents = n, "document snapshot swapped");
        Ok(n)
    }
}
