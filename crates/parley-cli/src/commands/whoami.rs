use parley_core::{DisplayProfile, Phase, Profile, SessionState};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CredentialArgs;
use crate::context::AppContext;
use crate::output::output;

/// Serialized view of the session state.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub signed_in: bool,
    pub phase: Phase,
    pub identity_id: Option<String>,
    pub email: Option<String>,
    pub display: Option<DisplayProfile>,
    pub profile: Option<Profile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_error: Option<String>,
}

impl From<&SessionState> for SessionResponse {
    fn from(state: &SessionState) -> Self {
        Self {
            signed_in: state.is_signed_in(),
            phase: state.phase,
            identity_id: state.identity_id().map(str::to_string),
            email: state.identity.as_ref().and_then(|i| i.email.clone()),
            display: state.display(),
            profile: state.profile.clone(),
            profile_error: state.profile_error.clone(),
        }
    }
}

/// Handle `parley whoami`.
pub async fn handle(
    credentials: &CredentialArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.sign_in_if_requested(credentials).await?;
    output(&SessionResponse::from(&ctx.controller.state()), flags.format)
}
