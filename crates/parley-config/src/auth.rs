//! Identity provider configuration.

use parley_core::PersistenceMode;
use serde::{Deserialize, Serialize};

/// Which persistence mode the session controller applies before each
/// credential exchange.
///
/// `provider_default` leaves the provider untouched and inherits whatever it
/// does by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    ProviderDefault,
    Local,
    #[default]
    Session,
    None,
}

impl PersistencePolicy {
    /// The mode to force on the provider, or `None` for `provider_default`.
    #[must_use]
    pub const fn mode(self) -> Option<PersistenceMode> {
        match self {
            Self::ProviderDefault => Option::None,
            Self::Local => Some(PersistenceMode::Local),
            Self::Session => Some(PersistenceMode::Session),
            Self::None => Some(PersistenceMode::None),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Session persistence policy (`session` unless overridden).
    #[serde(default)]
    pub persistence: PersistencePolicy,
}
