//! Per-user profile documents and merge-update semantics.
//!
//! A `Profile` is the stored document; a `ProfilePatch` is what callers send.
//! Only `Some` fields of a patch are written. `createdAt` is assigned once when
//! the document is first created and never touched by later merges;
//! `updatedAt` is reassigned on every write.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Stored profile document, keyed by `Identity::id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Profile {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile write. Absent fields are left untouched on merge and are
/// never serialized (no explicit nulls reach the store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ProfilePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.avatar.is_none() && self.status.is_none()
    }
}

pub struct ProfilePatchBuilder(ProfilePatch);

impl ProfilePatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(ProfilePatch::default())
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.0.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.0.avatar = Some(avatar.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.0.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ProfilePatch {
        self.0
    }
}

impl Default for ProfilePatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile {
    /// Create a fresh document from a patch. Both timestamps are set to `now`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the patch carries no display name.
    pub fn create(patch: &ProfilePatch, now: DateTime<Utc>) -> Result<Self, CoreError> {
        let display_name = patch.display_name.clone().ok_or_else(|| {
            CoreError::Validation("displayName is required when creating a profile".into())
        })?;
        Ok(Self {
            display_name,
            avatar: patch.avatar.clone(),
            status: patch.status.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite only the fields the patch carries, plus `updated_at`.
    pub fn merge(&mut self, patch: &ProfilePatch, now: DateTime<Utc>) {
        if let Some(display_name) = &patch.display_name {
            self.display_name.clone_from(display_name);
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = Some(avatar.clone());
        }
        if let Some(status) = &patch.status {
            self.status = Some(status.clone());
        }
        self.updated_at = now;
    }
}

/// Apply a create-or-merge write to an optional existing document.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the document does not exist yet and the
/// patch has no display name.
pub fn create_or_merge(
    existing: Option<Profile>,
    patch: &ProfilePatch,
    now: DateTime<Utc>,
) -> Result<Profile, CoreError> {
    match existing {
        Some(mut profile) => {
            profile.merge(patch, now);
            Ok(profile)
        }
        None => Profile::create(patch, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn create_sets_both_timestamps() {
        let patch = ProfilePatchBuilder::new().display_name("Ann").build();
        let profile = Profile::create(&patch, at(0)).unwrap();
        assert_eq!(profile.display_name, "Ann");
        assert_eq!(profile.created_at, at(0));
        assert_eq!(profile.updated_at, at(0));
        assert!(profile.avatar.is_none());
        assert!(profile.status.is_none());
    }

    #[test]
    fn create_requires_display_name() {
        let patch = ProfilePatchBuilder::new().status("busy").build();
        let err = Profile::create(&patch, at(0)).unwrap_err();
        assert!(err.to_string().contains("displayName is required"));
    }

    #[test]
    fn status_patch_leaves_display_name_untouched() {
        let created = create_or_merge(
            None,
            &ProfilePatchBuilder::new().display_name("Ann").build(),
            at(0),
        )
        .unwrap();
        let merged = create_or_merge(
            Some(created),
            &ProfilePatchBuilder::new().status("busy").build(),
            at(10),
        )
        .unwrap();

        assert_eq!(merged.display_name, "Ann");
        assert_eq!(merged.status.as_deref(), Some("busy"));
        assert_eq!(merged.created_at, at(0));
        assert_eq!(merged.updated_at, at(10));
    }

    #[test]
    fn merge_without_display_name_on_existing_is_allowed() {
        let mut profile = Profile::create(
            &ProfilePatchBuilder::new()
                .display_name("Ann")
                .avatar("https://img.example/a.png")
                .build(),
            at(0),
        )
        .unwrap();
        profile.merge(&ProfilePatch::default(), at(5));
        assert_eq!(profile.avatar.as_deref(), Some("https://img.example/a.png"));
        assert_eq!(profile.updated_at, at(5));
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ProfilePatchBuilder::new().status("busy").build();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "busy" }));
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        let patch = ProfilePatch::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }

    #[test]
    fn profile_document_omits_absent_optionals() {
        let profile =
            Profile::create(&ProfilePatchBuilder::new().display_name("Ann").build(), at(0))
                .unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["createdAt", "displayName", "updatedAt"]);
        assert!(object.values().all(|v| !v.is_null()));
    }
}
