//! Display defaults for views that need a name and avatar before (or without)
//! a stored profile.

use serde::Serialize;

use crate::identity::Identity;
use crate::profile::Profile;

const UNKNOWN: &str = "?";

/// What a view shows for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayProfile {
    pub display_name: String,
    pub avatar: Option<String>,
    pub status: Option<String>,
    pub initials: String,
    /// `true` when a stored profile document backed the values.
    pub from_profile: bool,
}

impl DisplayProfile {
    /// Resolve display values, preferring the stored profile and falling back
    /// to the identity's own fields.
    ///
    /// Name: profile → identity display name → email local part → `"?"`.
    /// Avatar: profile → identity avatar URL.
    #[must_use]
    pub fn resolve(identity: &Identity, profile: Option<&Profile>) -> Self {
        let display_name = profile
            .map(|p| p.display_name.trim())
            .filter(|name| !name.is_empty())
            .or_else(|| {
                identity
                    .display_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
            })
            .or_else(|| {
                identity
                    .email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
            })
            .unwrap_or(UNKNOWN)
            .to_string();

        let avatar = profile
            .and_then(|p| p.avatar.clone())
            .or_else(|| identity.avatar_url.clone());

        Self {
            initials: initials(&display_name),
            display_name,
            avatar,
            status: profile.and_then(|p| p.status.clone()),
            from_profile: profile.is_some(),
        }
    }
}

/// First letters of the first and last words, or the first letter of a single
/// word. `"?"` for blank input.
#[must_use]
pub fn initials(name: &str) -> String {
    fn first_char(word: &str) -> Option<char> {
        word.chars().next()
    }

    let parts: Vec<&str> = name.split_whitespace().collect();
    let letters: Vec<char> = match parts.as_slice() {
        [] => Vec::new(),
        [only] => first_char(only).into_iter().collect(),
        [first, .., last] => first_char(first)
            .into_iter()
            .chain(first_char(last))
            .collect(),
    };
    if letters.is_empty() {
        return UNKNOWN.to_string();
    }
    letters.into_iter().flat_map(char::to_uppercase).collect()
}
