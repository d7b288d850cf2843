use serde::{Deserialize, Serialize};

use crate::display::DisplayProfile;
use crate::enums::Phase;
use crate::identity::Identity;
use crate::profile::Profile;

/// Unified view of "who is signed in and what is their profile".
///
/// Only the session controller writes this; everyone else reads snapshots.
/// `profile` always belongs to `identity`. `generation` increases every time
/// a profile load starts or the identity changes, and a load result is only
/// applied while its captured generation is still current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
    pub phase: Phase,
    pub generation: u64,
    /// Last non-permission profile load failure for the current identity.
    pub profile_error: Option<String>,
}

impl SessionState {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    #[must_use]
    pub fn identity_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.id.as_str())
    }

    /// Display values for the signed-in user, `None` when signed out.
    #[must_use]
    pub fn display(&self) -> Option<DisplayProfile> {
        self.identity
            .as_ref()
            .map(|identity| DisplayProfile::resolve(identity, self.profile.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_initializing_and_empty() {
        let state = SessionState::default();
        assert_eq!(state.phase, Phase::Initializing);
        assert!(!state.is_ready());
        assert!(!state.is_signed_in());
        assert!(state.profile.is_none());
        assert_eq!(state.generation, 0);
        assert!(state.display().is_none());
    }

    #[test]
    fn display_uses_identity_when_profile_missing() {
        let state = SessionState {
            identity: Some(Identity::new("uid-1").with_display_name("Ann")),
            phase: Phase::Ready,
            ..SessionState::default()
        };
        assert_eq!(state.identity_id(), Some("uid-1"));
        let display = state.display().expect("signed in");
        assert_eq!(display.display_name, "Ann");
    }
}
