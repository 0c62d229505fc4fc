//! Asset path resolution.
//!
//! A [`PathResolver`] turns a `(map, level, layer)` triple into the location
//! a renderable loads from. Resolution is a pure function of its inputs, so
//! resolving the same triple twice always yields the same location.
//!
//! Two strategies are built in:
//! - [`TiledPathResolver`]: a folder; tile layers append `/{z}/{x}/{y}.png`
//! - [`ImagePathResolver`]: a single image file used as-is
//!
//! # Factory
//!
//! [`for_config`] picks the built-in matching the configured
//! [`RenderStrategy`](crate::RenderStrategy). Callers that store assets
//! elsewhere pass their own resolver to
//! [`WebmapOptions::with_path_resolver`](crate::WebmapOptions::with_path_resolver);
//! closures work too:
//!
//! ```
//! use floormap::resolver::{PathResolver, ResolveError};
//!
//! let cdn = |map: &str, level: &str, layer: &str| -> Result<String, ResolveError> {
//!     Ok(format!("https://cdn.example.com/{}/{}-{}", map, level, layer))
//! };
//! assert_eq!(cdn.resolve("hq", "L1", "floor").unwrap(), "https://cdn.example.com/hq/L1-floor");
//! ```

mod image;
mod tiled;

pub use image::ImagePathResolver;
pub use tiled::{TiledPathResolver, TILE_SUFFIX};

use thiserror::Error;

use crate::config::{MapConfig, RenderStrategy};

/// Errors that can occur while resolving a location.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// An identifier is empty or would escape its folder.
    #[error("Invalid {kind} identifier '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// Resolver-specific failure.
    #[error("Resolver error: {0}")]
    Other(String),
}

/// Maps `(map, level, layer)` to an asset location.
pub trait PathResolver {
    /// Resolves the location of one layer of one level.
    ///
    /// `level` may also be an underlay name; underlays are resolved against
    /// the primary layer identifier.
    fn resolve(&self, map: &str, level: &str, layer: &str) -> Result<String, ResolveError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> PathResolver for F
where
    F: Fn(&str, &str, &str) -> Result<String, ResolveError>,
{
    fn resolve(&self, map: &str, level: &str, layer: &str) -> Result<String, ResolveError> {
        self(map, level, layer)
    }
}

/// Create the built-in resolver for a configuration.
///
/// The tiled resolver is used for [`RenderStrategy::Tiles`]; everything else,
/// including an absent strategy, uses the single-image resolver.
pub fn for_config(config: &MapConfig) -> Box<dyn PathResolver> {
    match config.strategy() {
        RenderStrategy::Tiles { .. } => Box::new(TiledPathResolver::new(&config.assets.root)),
        RenderStrategy::Image => Box::new(ImagePathResolver::new(
            &config.assets.root,
            &config.assets.image_extension,
        )),
    }
}

/// Rejects identifiers that are empty or contain path navigation.
pub(crate) fn validate_segment(kind: &'static str, value: &str) -> Result<(), ResolveError> {
    let invalid = value.trim().is_empty()
        || value.contains('/')
        || value.contains('\\')
        || value == "."
        || value == "..";

    if invalid {
        return Err(ResolveError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates all three identifiers of a resolution request.
pub(crate) fn validate_triple(map: &str, level: &str, layer: &str) -> Result<(), ResolveError> {
    validate_segment("map", map)?;
    validate_segment("level", level)?;
    validate_segment("layer", layer)
}
