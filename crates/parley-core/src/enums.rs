//! Session phase and persistence mode enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Whether the identity provider has reported its state yet.
///
/// ```text
/// initializing → ready
/// ```
///
/// `Ready` is terminal for the lifetime of a subscription.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Initializing,
    Ready,
}

impl Phase {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Initializing => &[Self::Ready],
            Self::Ready => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PersistenceMode
// ---------------------------------------------------------------------------

/// How long an authenticated session outlives the client process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceMode {
    /// Survives restarts until an explicit sign-out.
    Local,
    /// Ends when the browser (or process) session ends.
    Session,
    /// Held in memory only; lost on reload.
    None,
}

impl PersistenceMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Session => "session",
            Self::None => "none",
        }
    }

    /// Whether the session should be written somewhere that survives a restart.
    #[must_use]
    pub const fn survives_restart(self) -> bool {
        matches!(self, Self::Local)
    }
}

impl fmt::Display for PersistenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersistenceMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "session" => Ok(Self::Session),
            "none" => Ok(Self::None),
            other => Err(CoreError::Validation(format!(
                "unknown persistence mode '{other}' (expected local, session, none)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_only_moves_forward() {
        assert!(Phase::Initializing.can_transition_to(Phase::Ready));
        assert!(!Phase::Ready.can_transition_to(Phase::Initializing));
        assert!(Phase::Ready.allowed_next_states().is_empty());
    }

    #[test]
    fn phase_defaults_to_initializing() {
        assert_eq!(Phase::default(), Phase::Initializing);
    }

    #[test]
    fn persistence_mode_serde_matches_as_str() {
        for mode in [
            PersistenceMode::Local,
            PersistenceMode::Session,
            PersistenceMode::None,
        ] {
            let json = serde_json::to_string(&mode).expect("serialize");
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
            assert_eq!(mode.as_str().parse::<PersistenceMode>().expect("parse"), mode);
        }
    }

    #[test]
    fn persistence_mode_rejects_unknown() {
        let err = "forever".parse::<PersistenceMode>().unwrap_err();
        assert!(err.to_string().contains("forever"));
    }

    #[test]
    fn only_local_survives_restart() {
        assert!(PersistenceMode::Local.survives_restart());
        assert!(!PersistenceMode::Session.survives_restart());
        assert!(!PersistenceMode::None.survives_restart());
    }
}
