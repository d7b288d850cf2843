//! Navigation entry points.

use serde::{Deserialize, Serialize};

fn default_sign_in_path() -> String {
    "/signin".into()
}

fn default_fallback_path() -> String {
    "/welcome".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutesConfig {
    /// Where the route gate sends signed-out visitors of protected routes.
    #[serde(default = "default_sign_in_path")]
    pub sign_in_path: String,

    /// Where `/` and unknown paths redirect.
    #[serde(default = "default_fallback_path")]
    pub fallback_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            sign_in_path: default_sign_in_path(),
            fallback_path: default_fallback_path(),
        }
    }
}
