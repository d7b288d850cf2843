use clap::{Args, Subcommand};

use crate::cli::root_commands::CredentialArgs;

/// Profile commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show the profile, with defaults filled in from the identity.
    Show(CredentialArgs),
    /// Set display name and optional status.
    Set(ProfileSetArgs),
    /// Set the avatar URL.
    Avatar(ProfileAvatarArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ProfileSetArgs {
    /// Display name (required, trimmed).
    #[arg(long)]
    pub name: String,
    /// Status line.
    #[arg(long)]
    pub status: Option<String>,
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

#[derive(Clone, Debug, Args)]
pub struct ProfileAvatarArgs {
    pub url: String,
    #[command(flatten)]
    pub credentials: CredentialArgs,
}
