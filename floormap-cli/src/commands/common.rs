//! Common arguments and loaders shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::Args;
use floormap::{MapConfig, MapDescription};
use tracing::{debug, info};

use crate::error::CliError;

/// Directory under the home directory holding the default config.
pub const CONFIG_DIR: &str = ".floormap";

/// Default config file name.
pub const CONFIG_FILE: &str = "config.ini";

/// Map inputs accepted by every command.
#[derive(Debug, Args)]
pub struct MapArgs {
    /// Map description (JSON)
    #[arg(short, long)]
    pub map: PathBuf,

    /// Layer configuration (INI). Defaults to ~/.floormap/config.ini when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Location of the default config file, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config from an explicit path, the default location, or defaults.
///
/// An explicit path must exist; the default location is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<MapConfig, CliError> {
    if let Some(path) = explicit {
        return Ok(MapConfig::load(path)?);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!(path = %path.display(), "Using default config");
            Ok(MapConfig::load(&path)?)
        }
        _ => {
            debug!("No config file found, using built-in defaults");
            Ok(MapConfig::default())
        }
    }
}

pub fn load_description(path: &Path) -> Result<MapDescription, CliError> {
    Ok(MapDescription::load(path)?)
}

/// Load both inputs named by `args`.
pub fn load_inputs(args: &MapArgs) -> Result<(MapConfig, MapDescription), CliError> {
    let config = load_config(args.config.as_deref())?;
    let description = load_description(&args.map)?;
    Ok((config, description))
}
