//! Floormap CLI - Command-line interface
//!
//! Inspect how a multi-level facility map is composed without a display
//! engine: which base layer each level gets, and which overlays the layer
//! control lists as levels are selected.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::preview::PreviewArgs;
use commands::resolve::ResolveArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "floormap", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a map composition and show its layers and overlay entries
    Preview(PreviewArgs),

    /// Print the asset location of one layer of one level
    Resolve(ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "floormap=debug" } else { "floormap=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Resolve(args) => commands::resolve::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_preview_with_selections() {
        let cli = Cli::try_parse_from([
            "floormap", "preview", "--map", "hq.json", "--select", "L2", "-s", "L1",
        ])
        .unwrap();

        match cli.command {
            Commands::Preview(args) => {
                assert_eq!(args.inputs.map.to_str(), Some("hq.json"));
                assert!(args.inputs.config.is_none());
                assert_eq!(args.select, ["L2", "L1"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "floormap", "-v", "resolve", "-m", "hq.json", "-c", "c.ini", "-l", "L1", "-n",
            "floor",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.level, "L1");
                assert_eq!(args.layer, "floor");
                assert_eq!(args.inputs.config.unwrap().to_str(), Some("c.ini"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
