//! Housing Map CLI - Command-line interface
//!
//! Runs map sessions over housing and energy datasets and manages the
//! configuration file.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::render::RenderArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "housingmap", version, about = "Housing and energy site map overlays")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the marker overlay for a map session
    Render(RenderArgs),

    /// View or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Config { command } => commands::config::run(command),
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_args() {
        let cli = Cli::try_parse_from([
            "housingmap",
            "render",
            "--housing",
            "h.json",
            "--energy",
            "e.json",
            "--center-lon",
            "-0.12",
            "--record",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.center_lon, Some(-0.12));
                assert_eq!(args.record.as_deref(), Some("3"));
                assert_eq!(args.container, "mapViewNode");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
