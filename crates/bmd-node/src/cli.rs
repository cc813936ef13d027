use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bmd", about = "Bitmessage object store daemon", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the object store and run the expiry sweeper until interrupted
    Run(RunArgs),
    /// List the available store drivers
    Drivers,
    /// Decode an object file and show its header
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured store driver
    #[arg(long)]
    pub driver: Option<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// File holding one raw object
    pub file: PathBuf,
    /// Treat the file contents as hex text
    #[arg(long)]
    pub hex: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run() {
        let cli = Cli::try_parse_from(["bmd", "run", "--config", "bmd.toml"]).unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("bmd.toml")));
            assert!(args.driver.is_none());
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_run_defaults() {
        let cli = Cli::try_parse_from(["bmd", "run"]).unwrap();
        assert!(matches!(cli.command, Command::Run(RunArgs { config: None, .. })));
    }

    #[test]
    fn parse_drivers() {
        let cli = Cli::try_parse_from(["bmd", "drivers"]).unwrap();
        assert!(matches!(cli.command, Command::Drivers));
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::try_parse_from(["bmd", "inspect", "obj.hex", "--hex"]).unwrap();
        if let Command::Inspect(args) = cli.command {
            assert_eq!(args.file, PathBuf::from("obj.hex"));
            assert!(args.hex);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn inspect_requires_file() {
        assert!(Cli::try_parse_from(["bmd", "inspect"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["bmd", "--verbose", "drivers"]).unwrap();
        assert!(cli.verbose);
    }
}
