use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SigninArgs;
use crate::commands::SessionResponse;
use crate::context::AppContext;
use crate::output::output;

/// Handle `parley signin`.
pub async fn handle(args: &SigninArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.controller
        .sign_in(&args.email, &args.password)
        .await
        .context("sign in failed")?;
    ctx.controller
        .refresh_profile()
        .await
        .context("failed to load profile")?;

    output(&SessionResponse::from(&ctx.controller.state()), flags.format)
}
