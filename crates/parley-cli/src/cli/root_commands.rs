use clap::{Args, Subcommand};

use crate::cli::subcommands::ProfileCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create an account and sign in.
    Signup(SignupArgs),
    /// Sign in with email and password.
    Signin(SigninArgs),
    /// Sign out and clear the local session.
    Signout,
    /// Show the signed-in identity and profile.
    Whoami(CredentialArgs),
    /// Show the gate decision for a path.
    Route(RouteArgs),
    /// Profile management.
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Defaults to --password.
    #[arg(long)]
    pub confirm_password: Option<String>,
    /// Display name.
    #[arg(long)]
    pub name: String,
}

#[derive(Clone, Debug, Args)]
pub struct SigninArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

/// Sign in first when no persisted session exists.
#[derive(Clone, Debug, Default, Args)]
pub struct CredentialArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, requires = "email")]
    pub password: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RouteArgs {
    /// Path to evaluate, e.g. /chat/uid-1.
    pub path: String,
    #[command(flatten)]
    pub credentials: CredentialArgs,
}
