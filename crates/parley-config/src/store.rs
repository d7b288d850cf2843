//! Profile store and local provider storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_collection() -> String {
    "users".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory for profile documents and local accounts.
    /// Empty means the platform data dir (`~/.local/share/parley` on Linux).
    #[serde(default)]
    pub data_dir: String,

    /// Collection (subdirectory) holding one document per identity.
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            collection: default_collection(),
        }
    }
}

impl StoreConfig {
    /// Resolve the data directory, falling back to the platform data dir.
    #[must_use]
    pub fn resolve_data_dir(&self) -> Option<PathBuf> {
        if self.data_dir.is_empty() {
            dirs::data_dir().map(|p| p.join("parley"))
        } else {
            Some(PathBuf::from(&self.data_dir))
        }
    }
}
