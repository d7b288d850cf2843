//! In-memory profile store.

use std::collections::HashMap;

use async_trait::async_trait;
use parley_core::{Profile, ProfilePatch};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{Clock, ProfileStore, apply_patch, system_clock, validate_key};

/// Whether the store's access rules let callers through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Access {
    #[default]
    Open,
    /// Every read and write fails with `PermissionDenied`, as a document
    /// store does before its access rules are provisioned.
    Denied,
}

pub struct MemoryProfileStore {
    documents: RwLock<HashMap<String, Profile>>,
    access: RwLock<Access>,
    clock: Clock,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    #[must_use]
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            access: RwLock::new(Access::Open),
            clock,
        }
    }

    pub async fn set_access(&self, access: Access) {
        *self.access.write().await = access;
    }

    /// Raw document as stored, bypassing access rules.
    pub async fn document(&self, id: &str) -> Option<Profile> {
        self.documents.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    async fn check_access(&self, id: &str) -> Result<(), StoreError> {
        match *self.access.read().await {
            Access::Open => Ok(()),
            Access::Denied => Err(StoreError::PermissionDenied(format!(
                "access to profile {id} is not permitted"
            ))),
        }
    }
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError> {
        validate_key(id)?;
        self.check_access(id).await?;
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn create_or_merge(&self, id: &str, patch: &ProfilePatch) -> Result<(), StoreError> {
        validate_key(id)?;
        self.check_access(id).await?;
        let mut documents = self.documents.write().await;
        let updated = apply_patch(documents.get(id).cloned(), patch, (self.clock)())?;
        tracing::debug!(profile_id = %id, created = !documents.contains_key(id), "profile written");
        documents.insert(id.to_string(), updated);
        Ok(())
    }
}
