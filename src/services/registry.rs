use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::models::DatasetMetadata;

/// Process-scoped store of uploaded datasets.
///
/// Entries are bounded by an LRU policy; when one is evicted its stored file
/// is removed from disk as well.
pub struct DatasetRegistry {
    entries: Mutex<LruCache<String, DatasetMetadata>>,
}

impl DatasetRegistry {
    pub fn new(capacity: NonZeroUsize) -> Self {
        info!("Creating dataset registry with capacity {}", capacity);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn insert(&self, metadata: DatasetMetadata) {
        let new_id = metadata.dataset_id.clone();
        let evicted = self.entries.lock().push(new_id.clone(), metadata);
        if let Some((id, old)) = evicted {
            // `push` also hands back the previous value when the id was already present
            if id == new_id {
                return;
            }
            info!("Evicting dataset {} ({})", id, old.filename);
            remove_file(&old);
        }
    }

    pub fn get(&self, dataset_id: &str) -> Option<DatasetMetadata> {
        self.entries.lock().get(dataset_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry and its stored file. Called on shutdown.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        while let Some((_, metadata)) = entries.pop_lru() {
            remove_file(&metadata);
        }
        info!("Dataset registry cleared ({} datasets removed)", count);
    }
}

fn remove_file(metadata: &DatasetMetadata) {
    match std::fs::remove_file(&metadata.file_path) {
        Ok(()) => debug!("Removed {}", metadata.file_path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", metadata.file_path.display(), e),
    }
}
