//! CLI error type.

use floormap::{ConfigError, DescriptionError, ResolveError, WebmapError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Map description error: {0}")]
    Description(#[from] DescriptionError),

    #[error("Failed to compose map: {0}")]
    Webmap(#[from] WebmapError),

    #[error("Failed to resolve location: {0}")]
    Resolve(#[from] ResolveError),
}
