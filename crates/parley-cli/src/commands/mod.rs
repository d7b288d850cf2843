mod profile;
mod route;
mod signin;
mod signout;
mod signup;
mod whoami;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

pub use whoami::SessionResponse;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Signup(args) => signup::handle(&args, ctx, flags).await,
        Commands::Signin(args) => signin::handle(&args, ctx, flags).await,
        Commands::Signout => signout::handle(ctx, flags).await,
        Commands::Whoami(args) => whoami::handle(&args, ctx, flags).await,
        Commands::Route(args) => route::handle(&args, ctx, flags).await,
        Commands::Profile { action } => profile::handle(&action, ctx, flags).await,
    }
}
