use parley_core::{DisplayProfile, Profile};
use parley_session::ProfileEditor;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ProfileAvatarArgs, ProfileCommands, ProfileSetArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ProfileResponse {
    identity_id: String,
    display: DisplayProfile,
    /// `null` until the first save creates the document.
    profile: Option<Profile>,
}

/// Handle `parley profile <subcommand>`.
pub async fn handle(
    action: &ProfileCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let editor = ProfileEditor::new(&ctx.controller);
    match action {
        ProfileCommands::Show(credentials) => ctx.require_identity(credentials).await?,
        ProfileCommands::Set(ProfileSetArgs {
            name,
            status,
            credentials,
        }) => {
            ctx.require_identity(credentials).await?;
            editor.save(name, status.as_deref()).await?;
        }
        ProfileCommands::Avatar(ProfileAvatarArgs { url, credentials }) => {
            ctx.require_identity(credentials).await?;
            editor.set_avatar(url).await?;
        }
    }

    let state = ctx.controller.state();
    let (Some(identity_id), Some(display)) = (state.identity_id(), state.display()) else {
        anyhow::bail!("not signed in");
    };
    let response = ProfileResponse {
        identity_id: identity_id.to_string(),
        display,
        profile: state.profile.clone(),
    };
    output(&response, flags.format)
}
