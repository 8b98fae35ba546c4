//! Process-wide, set-once reference to the serving index.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::{error, info, warn};

use crate::core::error::{DocMindError, Result};
use crate::core::storage::vector_index::{VectorIndex, VectorSearch};

/// Shared handle to the index used for answering questions.
///
/// Set at most once (normally at startup) and read-only afterwards.
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct IndexHandle {
    slot: Arc<OnceLock<Arc<dyn VectorSearch>>>,
}

impl IndexHandle {
    /// Handle with no index installed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Handle with `index` already installed
    pub fn with_index(index: Arc<dyn VectorSearch>) -> Self {
        let handle = Self::default();
        // A fresh slot cannot be occupied
        let _ = handle.slot.set(index);
        handle
    }

    /// Install the serving index. Fails if one is already installed.
    pub fn install(&self, index: Arc<dyn VectorSearch>) -> Result<()> {
        self.slot
            .set(index)
            .map_err(|_| DocMindError::ConfigError("an index is already installed".to_string()))
    }

    pub fn get(&self) -> Option<Arc<dyn VectorSearch>> {
        self.slot.get().cloned()
    }

    /// The installed index, or `ServiceUnavailable`
    pub fn require(&self) -> Result<Arc<dyn VectorSearch>> {
        self.get().ok_or_else(|| {
            DocMindError::ServiceUnavailable(
                "no document index is loaded; run ingestion first".to_string(),
            )
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Load the snapshot at `path` and install it.
    ///
    /// Never fails: a missing snapshot is logged as a warning, an
    /// unreadable one as an error, and the handle stays empty so the
    /// server can start and report 503s.
    pub fn load_at_startup(&self, path: &Path) -> bool {
        match VectorIndex::load(path) {
            Ok(index) => {
                let entries = index.len();
                let dimension = index.dimension();
                if let Err(e) = self.install(Arc::new(index)) {
                    warn!("{}", e);
                    return false;
                }
                info!(
                    "Loaded vector index from {} ({} entries, dimension {:?})",
                    path.display(),
                    entries,
                    dimension
                );
                true
            }
            Err(DocMindError::IndexNotFound(_)) => {
                warn!(
                    "No vector index at {}; questions will be rejected until ingestion runs",
                    path.display()
                );
                false
            }
            Err(e) => {
                error!("Failed to load vector index: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for IndexHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
