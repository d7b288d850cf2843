//! Route table.
//!
//! ```text
//! /welcome  /signin  /signup                     public
//! /chat/:userId  /board/:boardId  /profile  /settings   protected
//! /  and anything else                           fallback
//! ```

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Welcome,
    SignIn,
    SignUp,
    Chat { user_id: String },
    Board { board_id: String },
    Profile,
    Settings,
    /// `/` or an unknown path.
    Fallback,
}

impl Route {
    /// Match `path` against the table. Query strings, fragments, and a
    /// trailing slash are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["welcome"] => Self::Welcome,
            ["signin"] => Self::SignIn,
            ["signup"] => Self::SignUp,
            ["chat", user_id] => Self::Chat {
                user_id: (*user_id).to_string(),
            },
            ["board", board_id] => Self::Board {
                board_id: (*board_id).to_string(),
            },
            ["profile"] => Self::Profile,
            ["settings"] => Self::Settings,
            _ => Self::Fallback,
        }
    }

    #[must_use]
    pub const fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::Chat { .. } | Self::Board { .. } | Self::Profile | Self::Settings
        )
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Welcome | Self::SignIn | Self::SignUp)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => f.write_str("/welcome"),
            Self::SignIn => f.write_str("/signin"),
            Self::SignUp => f.write_str("/signup"),
            Self::Chat { user_id } => write!(f, "/chat/{user_id}"),
            Self::Board { board_id } => write!(f, "/board/{board_id}"),
            Self::Profile => f.write_str("/profile"),
            Self::Settings => f.write_str("/settings"),
            Self::Fallback => f.write_str("/"),
        }
    }
}
