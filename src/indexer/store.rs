// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent index store and in-process cache.
//!
//! One JSON snapshot per project root, keyed by a fixed-length digest of the
//! canonical root path, under a process-wide data directory. Writers publish
//! a complete snapshot via temp-file + rename or nothing at all.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::IndexError;
use crate::indexer::build::ProjectIndex;

/// Overrides the snapshot directory; used by tests and sandboxed runs.
pub const DATA_DIR_ENV: &str = "SYMDEX_DATA_DIR";

const ROOT_KEY_LEN: usize = 16;

/// Durable key-value persistence for [`ProjectIndex`] snapshots.
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    /// Store under `$SYMDEX_DATA_DIR` or the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .context("no data directory available on this platform")?
                .join("symdex"),
        };
        Self::at(dir.join("indexes"))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create store directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Stable, collision-resistant key for a project root.
    pub fn root_key(root: &Path) -> String {
        let digest = blake3::hash(root.to_string_lossy().as_bytes());
        digest.to_hex()[..ROOT_KEY_LEN].to_string()
    }

    fn snapshot_path(&self, root: &Path) -> PathBuf {
        self.dir.join(format!("{}.json", Self::root_key(root)))
    }

    /// Load the snapshot for a root. Absent or unreadable snapshots are both
    /// "no prior state", never an error.
    pub fn load(&self, root: &Path) -> Option<ProjectIndex> {
        let path = self.snapshot_path(root);
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(index) => Some(index),
            Err(err) => {
                tracing::warn!(root = %root.display(), %err, "discarding unreadable snapshot");
                None
            }
        }
    }

    /// Persist a snapshot, replacing any prior one for the same root
    /// atomically from the reader's perspective.
    pub fn save(&self, index: &ProjectIndex) -> Result<()> {
        let path = self.snapshot_path(&index.root);
        let content = serde_json::to_string(index)?;
        atomic_write_bytes(&path, content.as_bytes())
            .map_err(|source| IndexError::StoreWrite { path, source })?;
        Ok(())
    }
}

pub(crate) fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let Some(parent) = path.parent() else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        ));
    };
    std::fs::create_dir_all(parent)?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    let tmp_name = format!(
        ".{}.tmp-{}-{}",
        path.file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("symdex"),
        std::process::id(),
        nonce
    );
    let tmp_path = parent.join(tmp_name);

    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp_path, path)
}

/// Process-wide cache of live snapshots, at most one per project root.
///
/// Populated on load or index, replaced atomically on explicit re-index,
/// never invalidated by filesystem changes.
#[derive(Default)]
pub struct IndexCache {
    entries: Mutex<HashMap<PathBuf, Arc<ProjectIndex>>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, root: &Path) -> Option<Arc<ProjectIndex>> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .get(root)
            .cloned()
    }

    /// Replace the cached entry for the index's root.
    pub fn insert(&self, index: ProjectIndex) -> Arc<ProjectIndex> {
        let index = Arc::new(index);
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(index.root.clone(), Arc::clone(&index));
        index
    }

    /// Cached copy if present, otherwise a store load (cached on hit).
    pub fn get_or_load(&self, store: &IndexStore, root: &Path) -> Option<Arc<ProjectIndex>> {
        if let Some(index) = self.get(root) {
            return Some(index);
        }
        store.load(root).map(|index| self.insert(index))
    }
}
