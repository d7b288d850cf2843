//! The profile store port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parley_core::{Profile, ProfilePatch};

use crate::error::StoreError;

/// Source of server-assigned timestamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Wall-clock time.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Key/value profile document store keyed by identity ID.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Read the document. `Ok(None)` means it does not exist.
    async fn get(&self, id: &str) -> Result<Option<Profile>, StoreError>;

    /// Create the document from `patch` (with `createdAt`/`updatedAt`) or merge
    /// `patch` into the existing one (only its fields plus `updatedAt`).
    async fn create_or_merge(&self, id: &str, patch: &ProfilePatch) -> Result<(), StoreError>;
}

/// Reject keys that are empty or could escape a collection directory.
pub(crate) fn validate_key(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
        return Err(StoreError::InvalidKey(id.to_string()));
    }
    Ok(())
}

/// Shared create-or-merge step used by every implementation.
pub(crate) fn apply_patch(
    existing: Option<Profile>,
    patch: &ProfilePatch,
    now: DateTime<Utc>,
) -> Result<Profile, StoreError> {
    parley_core::profile::create_or_merge(existing, patch, now)
        .map_err(|e| StoreError::InvalidDocument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    #[case("a\\b")]
    fn rejects_unsafe_keys(#[case] id: &str) {
        assert!(matches!(validate_key(id), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn accepts_generated_ids() {
        assert!(validate_key("uid-0123456789abcdef").is_ok());
    }
}
