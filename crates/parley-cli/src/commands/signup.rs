use anyhow::Context;
use parley_session::SignUpForm;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SignupArgs;
use crate::commands::SessionResponse;
use crate::context::AppContext;
use crate::output::output;

/// Handle `parley signup`.
pub async fn handle(args: &SignupArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let form = SignUpForm {
        email: args.email.clone(),
        password: args.password.clone(),
        confirm_password: args
            .confirm_password
            .clone()
            .unwrap_or_else(|| args.password.clone()),
        display_name: args.name.clone(),
    };
    let valid = form.validate()?;

    ctx.controller
        .sign_up(&valid.email, &valid.password, &valid.display_name)
        .await
        .context("sign up failed")?;
    ctx.controller
        .refresh_profile()
        .await
        .context("failed to load profile")?;

    output(&SessionResponse::from(&ctx.controller.state()), flags.format)
}
