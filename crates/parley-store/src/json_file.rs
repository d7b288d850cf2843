//! Directory-backed profile store: one JSON document per identity.
//!
//! ```text
//! <root>/<collection>/<identity id>.json
//! ```
//!
//! Filesystem permission failures surface as `StoreError::PermissionDenied`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parley_core::{Profile, ProfilePatch};
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::{Clock, ProfileStore, apply_patch, system_clock, validate_key};

pub struct JsonFileProfileStore {
    collection_dir: PathBuf,
    clock: Clock,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileProfileStore {
    /// Store rooted at `root`, keeping documents under `root/collection`.
    /// The directory is created lazily on first write.
    pub fn new(root: impl AsRef<Path>, collection: &str) -> Self {
        Self::with_clock(root, collection, system_clock())
    }

    pub fn with_clock(root: impl AsRef<Path>, collection: &str, clock: Clock) -> Self {
        Self {
            collection_dir: root.as_ref().join(collection),
            clock,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn collection_dir(&self) -> &Path {
        &self.collection_dir
    }

    /// Path of the document for `id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` if `id` is not a safe file name.
    pub fn document_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_key(id)?;
        Ok(self.collection_dir.join(format!("{id}.json")))
    }

    async fn read(&self, path: &Path) -> Result<Option<Profile>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Serialization {
                    path: path.to_path_buf(),
                    source,
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn write(&self, path: &Path, profile: &Profile) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.collection_dir)
            .await
            .map_err(|e| StoreError::io(&self.collection_dir, e))?;

        let json =
            serde_json::to_string_pretty(profile).map_err(|source| StoreError::Serialization {
                path: path.to_path_buf(),
                source,
            })?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StoreError::io(path, e))
    }
}

#[async_trait]
impl ProfileStore for JsonFileProfileStore {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        let path = self.document_path(id)?;
        self.read(&path).await
    }

    async fn create_or_merge(&self, id: &str, patch: &ProfilePatch) -> Result<(), StoreError> {
        let path = self.document_path(id)?;
        let _guard = self.write_lock.lock().await;
        let existing = self.read(&path).await?;
        let created = existing.is_none();
        let updated = apply_patch(existing, patch, (self.clock)())?;
        self.write(&path, &updated).await?;
        tracing::debug!(profile_id = %id, created, path = %path.display(), "profile written");
        Ok(())
    }
}
