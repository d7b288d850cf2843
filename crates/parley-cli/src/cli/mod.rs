use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `parley` binary.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about = "Parley - session and profile tooling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory for accounts and profiles (overrides store.data_dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            data_dir: self.data_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::ProfileCommands;
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["parley", "--format", "raw", "--verbose", "whoami"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Whoami(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["parley", "signout", "--quiet", "--data-dir", "/tmp/p"])
            .expect("cli should parse");

        let flags = cli.global_flags();
        assert!(flags.quiet);
        assert!(!flags.verbose);
        assert_eq!(flags.data_dir.as_deref(), Some("/tmp/p"));
        assert!(matches!(cli.command, Commands::Signout));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["parley", "--format", "table", "whoami"]).is_err());
    }

    #[test]
    fn signup_requires_email_password_and_name() {
        assert!(Cli::try_parse_from(["parley", "signup", "--email", "a@b.io"]).is_err());

        let cli = Cli::try_parse_from([
            "parley",
            "signup",
            "--email",
            "a@b.io",
            "--password",
            "secret-pw",
            "--name",
            "Ann",
        ])
        .expect("cli should parse");
        let Commands::Signup(args) = cli.command else {
            panic!("expected signup");
        };
        assert_eq!(args.name, "Ann");
        assert!(args.confirm_password.is_none());
    }

    #[test]
    fn password_requires_email() {
        assert!(Cli::try_parse_from(["parley", "whoami", "--password", "pw"]).is_err());
    }

    #[test]
    fn route_takes_a_path() {
        let cli = Cli::try_parse_from(["parley", "route", "/chat/uid-1"]).expect("cli should parse");
        let Commands::Route(args) = cli.command else {
            panic!("expected route");
        };
        assert_eq!(args.path, "/chat/uid-1");
    }

    #[test]
    fn profile_set_parses_optional_status() {
        let cli = Cli::try_parse_from([
            "parley", "profile", "set", "--name", "Ann", "--status", "busy",
        ])
        .expect("cli should parse");
        let Commands::Profile { action } = cli.command else {
            panic!("expected profile");
        };
        let ProfileCommands::Set(args) = action else {
            panic!("expected profile set");
        };
        assert_eq!(args.name, "Ann");
        assert_eq!(args.status.as_deref(), Some("busy"));
    }

    #[test]
    fn profile_avatar_takes_url() {
        let cli = Cli::try_parse_from(["parley", "profile", "avatar", "https://x.io/a.png"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Profile {
                action: ProfileCommands::Avatar(_)
            }
        ));
    }
}
