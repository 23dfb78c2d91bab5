// src/pipeline/cache.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use blake3::Hasher;
use tracing::debug;

/// Content fingerprint used by the incremental cache.
pub fn fingerprint(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    hasher.finalize().to_hex().to_string()
}

/// Remembers the fingerprint of every input a task has built.
///
/// Owned by a single task and shared by all of its invocations, so a rebuild
/// only recomputes inputs whose contents changed. A fingerprint is recorded
/// only after the output was written; a file that failed is retried.
#[derive(Debug, Default)]
pub struct IncrementalCache {
    fingerprints: Mutex<HashMap<PathBuf, String>>,
}

impl IncrementalCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `path` was last built from contents with this fingerprint.
    pub fn is_unchanged(&self, path: &Path, fingerprint: &str) -> bool {
        let map = self.fingerprints.lock().unwrap_or_else(|e| e.into_inner());
        map.get(path).is_some_and(|known| known == fingerprint)
    }

    pub fn record(&self, path: &Path, fingerprint: String) {
        debug!(?path, "recording build fingerprint");
        let mut map = self.fingerprints.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(path.to_path_buf(), fingerprint);
    }
}
