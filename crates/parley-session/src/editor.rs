//! Profile editing through the session controller.

use parley_core::{DisplayProfile, ProfilePatchBuilder};
use serde::Serialize;

use crate::controller::SessionController;
use crate::error::{ProfileEditError, SessionError};

/// Initial form values for the profile editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDraft {
    pub display_name: String,
    pub status: Option<String>,
    pub avatar: Option<String>,
}

impl From<DisplayProfile> for ProfileDraft {
    fn from(display: DisplayProfile) -> Self {
        Self {
            display_name: display.display_name,
            status: display.status,
            avatar: display.avatar,
        }
    }
}

pub struct ProfileEditor<'a> {
    controller: &'a SessionController,
}

impl<'a> ProfileEditor<'a> {
    #[must_use]
    pub const fn new(controller: &'a SessionController) -> Self {
        Self { controller }
    }

    /// Form values from the stored profile, falling back to the identity.
    ///
    /// # Errors
    ///
    /// `SessionError::NotSignedIn` when nobody is signed in.
    pub fn draft(&self) -> Result<ProfileDraft, SessionError> {
        self.controller
            .state()
            .display()
            .map(ProfileDraft::from)
            .ok_or(SessionError::NotSignedIn)
    }

    /// Save the display name and optional status. Both are trimmed; a blank
    /// status is left out of the write.
    ///
    /// # Errors
    ///
    /// `ProfileEditError::DisplayNameRequired` for a blank name, otherwise
    /// whatever the controller's save returns.
    pub async fn save(
        &self,
        display_name: &str,
        status: Option<&str>,
    ) -> Result<(), ProfileEditError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ProfileEditError::DisplayNameRequired);
        }

        let mut patch = ProfilePatchBuilder::new().display_name(display_name);
        if let Some(status) = status.map(str::trim).filter(|s| !s.is_empty()) {
            patch = patch.status(status);
        }
        self.controller.save_profile(&patch.build()).await?;
        Ok(())
    }

    /// Save only the avatar URL.
    ///
    /// # Errors
    ///
    /// `ProfileEditError::AvatarRequired` for a blank URL. Creating a
    /// profile from an avatar alone is rejected by the store.
    pub async fn set_avatar(&self, url: &str) -> Result<(), ProfileEditError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ProfileEditError::AvatarRequired);
        }
        let patch = ProfilePatchBuilder::new().avatar(url).build();
        self.controller.save_profile(&patch).await?;
        Ok(())
    }
}
