//! # parley-config
//!
//! Layered configuration loading for Parley using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PARLEY_*` prefix, `__` as separator)
//! 2. Project-level `.parley/config.toml`
//! 3. User-level `~/.config/parley/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PARLEY_AUTH__PERSISTENCE` -> `auth.persistence`,
//! `PARLEY_STORE__DATA_DIR` -> `store.data_dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use parley_config::ParleyConfig;
//!
//! let config = ParleyConfig::load_with_dotenv().expect("config");
//! println!("persistence: {:?}", config.auth.persistence);
//! ```

mod auth;
mod error;
mod routes;
mod store;

pub use auth::{AuthConfig, PersistencePolicy};
pub use error::ConfigError;
pub use routes::RoutesConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

impl ParleyConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".parley/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("PARLEY_").split("__"))
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let collection = self.store.collection.trim();
        if collection.is_empty() {
            return Err(invalid("store.collection", "must not be empty"));
        }
        let mut components = Path::new(collection).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if collection.contains(['/', '\\']) || !single_normal {
            return Err(invalid(
                "store.collection",
                "must be a single path segment",
            ));
        }
        for (field, path) in [
            ("routes.sign_in_path", &self.routes.sign_in_path),
            ("routes.fallback_path", &self.routes.fallback_path),
        ] {
            if !path.starts_with('/') {
                return Err(invalid(field, "must start with '/'"));
            }
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("parley").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ParleyConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.auth.persistence, PersistencePolicy::Session);
        assert_eq!(config.routes.sign_in_path, "/signin");
        assert_eq!(config.routes.fallback_path, "/welcome");
    }

    #[test]
    fn figment_builds_without_files() {
        let config: ParleyConfig = ParleyConfig::figment()
            .extract()
            .expect("should extract defaults");
        assert_eq!(config.store.collection, "users");
    }

    #[test]
    fn collection_with_separator_is_rejected() {
        let mut config = ParleyConfig::default();
        config.store.collection = "users/../etc".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.collection"));
    }

    #[test]
    fn dot_dot_collection_is_rejected() {
        let mut config = ParleyConfig::default();
        config.store.collection = "..".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_sign_in_path_is_rejected() {
        let mut config = ParleyConfig::default();
        config.routes.sign_in_path = "signin".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("routes.sign_in_path"));
    }
}
