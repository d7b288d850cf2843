use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::commands::SessionResponse;
use crate::context::AppContext;
use crate::output::output;

/// Handle `parley signout`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.controller.sign_out().await.context("sign out failed")?;
    output(&SessionResponse::from(&ctx.controller.state()), flags.format)
}
