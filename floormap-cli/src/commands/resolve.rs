//! `resolve` command: print the location of one layer of one level.

use clap::Args;
use floormap::resolver::{self, ResolveError};
use floormap::{MapConfig, MapDescription};
use tracing::debug;

use super::common::{self, MapArgs};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub inputs: MapArgs,

    /// Level (or underlay) name
    #[arg(short, long)]
    pub level: String,

    /// Layer identifier
    #[arg(short = 'n', long)]
    pub layer: String,
}

/// Run the resolve command.
pub fn run(args: ResolveArgs) -> Result<(), CliError> {
    let (config, description) = common::load_inputs(&args.inputs)?;
    let location = resolve_location(&config, &description, &args.level, &args.layer)?;
    println!("{}", location);
    Ok(())
}

/// Resolve with the resolver the configured strategy selects.
fn resolve_location(
    config: &MapConfig,
    description: &MapDescription,
    level: &str,
    layer: &str,
) -> Result<String, ResolveError> {
    let resolver = resolver::for_config(config);
    debug!(
        resolver = resolver.name(),
        map = %description.name,
        level = %level,
        layer = %layer,
        "Resolving location"
    );
    resolver.resolve(&description.name, level, layer)
}
