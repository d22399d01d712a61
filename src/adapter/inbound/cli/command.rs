//! Command-line interface definitions.
//!
//! Defines the CLI structure for boostwatch using `clap`: running the bot,
//! validating configuration and the operator commands that inspect or sweep
//! subscriptions without starting the bot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Boost alert and VIP subscription bot
#[derive(Parser, Debug)]
#[command(name = "boostwatch")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitor, the expiry sweeper and the Telegram bot
    Run(RunArgs),

    /// Validate the configuration and report missing secrets
    Check(CheckArgs),

    /// List stored subscriptions
    Subscribers(ConfigPathArg),

    /// Remove expired subscriptions once and exit
    Sweep(ConfigPathArg),
}

/// Shared argument for commands that only need the configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for `boostwatch run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Log messages instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `boostwatch check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Also fetch the current boost from the upstream API.
    #[arg(long)]
    pub live: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::try_parse_from(["boostwatch", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(!args.dry_run);
        assert!(!cli.json);
        assert!(!cli.quiet);
    }

    #[test]
    fn parse_run_with_flags() {
        let cli =
            Cli::try_parse_from(["boostwatch", "run", "-c", "prod.toml", "--dry-run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.config, PathBuf::from("prod.toml"));
        assert!(args.dry_run);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["boostwatch", "check", "--live", "--json", "-q"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Check(CheckArgs { live: true, .. })));
    }

    #[test]
    fn operator_commands_take_config() {
        let cli = Cli::try_parse_from(["boostwatch", "sweep", "--config", "x.toml"]).unwrap();
        let Commands::Sweep(arg) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(arg.config, PathBuf::from("x.toml"));

        let cli = Cli::try_parse_from(["boostwatch", "subscribers"]).unwrap();
        assert!(matches!(cli.command, Commands::Subscribers(_)));
    }

    #[test]
    fn unknown_subcommand_fails() {
        assert!(Cli::try_parse_from(["boostwatch", "trade"]).is_err());
    }
}
