//! Map configuration.
//!
//! A [`MapConfig`] carries everything about a composition that is not part of
//! the map description itself: the render strategy (tiles or single images),
//! the human-readable labels of layer identifiers, and where assets live.
//!
//! # File Format
//!
//! Configuration files are INI:
//!
//! ```ini
//! [layer_settings]
//! type = tiles
//! tile_size = 256
//!
//! [assets]
//! root = /maps
//! image_extension = png
//!
//! [layer.electrical]
//! display = Electrical
//! ```
//!
//! A missing `[layer_settings]` section, or any `type` other than `tiles`,
//! selects the single-image strategy.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use thiserror::Error;

/// Tile size used when `[layer_settings]` selects tiles without a size.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default root prepended to every resolved asset location.
pub const DEFAULT_ASSET_ROOT: &str = "maps";

/// Default file extension for single-image assets.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

const SECTION_LAYER_SETTINGS: &str = "layer_settings";
const SECTION_ASSETS: &str = "assets";
const LAYER_SECTION_PREFIX: &str = "layer.";

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("Failed to load config {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// The configuration text is not valid INI.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A required key is missing from a section.
    #[error("Missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    /// A key holds a value that cannot be used.
    #[error("Invalid value '{value}' for '{key}' in section [{section}]")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

/// How base layers and overlays are rendered.
///
/// Chosen once per configuration; every layer of a composition uses the
/// same strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Raster tiles addressed by zoom/x/y below a per-layer folder.
    Tiles { tile_size: u32 },
    /// One image file per layer, stretched over the map bounds.
    Image,
}

impl RenderStrategy {
    /// Tiled strategy with the given tile size in pixels.
    pub fn tiles(tile_size: u32) -> Self {
        RenderStrategy::Tiles { tile_size }
    }

    /// Check if this is the tiled strategy.
    pub fn is_tiles(&self) -> bool {
        matches!(self, RenderStrategy::Tiles { .. })
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Tiles { tile_size } => write!(f, "tiles ({}px)", tile_size),
            RenderStrategy::Image => write!(f, "image"),
        }
    }
}

/// Per-layer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    /// Label shown for this layer in the layer-selection control.
    pub display: String,
}

impl LayerConfig {
    /// Create a layer config with the given display label.
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
        }
    }
}

/// Where the built-in path resolvers find assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetConfig {
    /// Folder or URL prefix for all maps.
    pub root: String,

    /// Extension appended by the single-image resolver.
    pub image_extension: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ASSET_ROOT.to_string(),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
        }
    }
}

/// Configuration for one map composition.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    /// Render strategy; `None` behaves like [`RenderStrategy::Image`].
    pub layer_settings: Option<RenderStrategy>,

    /// Layer identifier to layer settings.
    pub layers: HashMap<String, LayerConfig>,

    /// Asset location settings.
    pub assets: AssetConfig,
}

impl MapConfig {
    /// Load a configuration from an INI file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Parse a configuration from INI text.
    pub fn from_ini_str(text: &str) -> ConfigResult<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some(SECTION_LAYER_SETTINGS)) {
            config.layer_settings = Some(parse_layer_settings(section)?);
        }

        if let Some(section) = ini.section(Some(SECTION_ASSETS)) {
            if let Some(root) = section.get("root") {
                config.assets.root = root.trim_end_matches('/').to_string();
            }
            if let Some(ext) = section.get("image_extension") {
                config.assets.image_extension = ext.trim_start_matches('.').to_string();
            }
        }

        for (name, section) in ini.iter() {
            let Some(layer_id) = name.and_then(|n| n.strip_prefix(LAYER_SECTION_PREFIX)) else {
                continue;
            };
            let display = section
                .get("display")
                .ok_or_else(|| ConfigError::MissingKey {
                    section: format!("{}{}", LAYER_SECTION_PREFIX, layer_id),
                    key: "display".to_string(),
                })?;
            config
                .layers
                .insert(layer_id.to_string(), LayerConfig::new(display));
        }

        Ok(config)
    }

    /// The effective render strategy.
    pub fn strategy(&self) -> RenderStrategy {
        self.layer_settings.unwrap_or(RenderStrategy::Image)
    }

    /// Display label configured for a layer identifier.
    pub fn display_label(&self, layer_id: &str) -> Option<&str> {
        self.layers.get(layer_id).map(|l| l.display.as_str())
    }

    /// Set the render strategy.
    pub fn with_strategy(mut self, strategy: RenderStrategy) -> Self {
        self.layer_settings = Some(strategy);
        self
    }

    /// Add a display label for a layer identifier.
    pub fn with_layer(mut self, layer_id: impl Into<String>, display: impl Into<String>) -> Self {
        self.layers.insert(layer_id.into(), LayerConfig::new(display));
        self
    }

    /// Set the asset root.
    pub fn with_asset_root(mut self, root: impl Into<String>) -> Self {
        self.assets.root = root.into();
        self
    }

    /// Set the single-image file extension.
    pub fn with_image_extension(mut self, ext: impl Into<String>) -> Self {
        self.assets.image_extension = ext.into();
        self
    }
}

fn parse_layer_settings(section: &Properties) -> ConfigResult<RenderStrategy> {
    let kind = section
        .get("type")
        .ok_or_else(|| ConfigError::MissingKey {
            section: SECTION_LAYER_SETTINGS.to_string(),
            key: "type".to_string(),
        })?;

    if !kind.trim().eq_ignore_ascii_case("tiles") {
        return Ok(RenderStrategy::Image);
    }

    let tile_size = match section.get("tile_size") {
        None => DEFAULT_TILE_SIZE,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(size) if size > 0 => size,
            _ => {
                return Err(ConfigError::InvalidValue {
                    section: SECTION_LAYER_SETTINGS.to_string(),
                    key: "tile_size".to_string(),
                    value: raw.to_string(),
                })
            }
        },
    };

    Ok(RenderStrategy::Tiles { tile_size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_CONFIG: &str = "\
[layer_settings]
type = Tiles
tile_size = 512

[assets]
root = https://cdn.example.com/maps/
image_extension = .jpg

[layer.floor]
display = Floor plan

[layer.electrical]
display = Electrical
";

    #[test]
    fn test_full_config() {
        let config = MapConfig::from_ini_str(FULL_CONFIG).unwrap();

        assert_eq!(config.strategy(), RenderStrategy::tiles(512));
        assert_eq!(config.assets.root, "https://cdn.example.com/maps");
        assert_eq!(config.assets.image_extension, "jpg");
        assert_eq!(config.display_label("floor"), Some("Floor plan"));
        assert_eq!(config.display_label("electrical"), Some("Electrical"));
        assert_eq!(config.display_label("plumbing"), None);
    }

    #[test]
    fn test_missing_layer_settings_selects_image() {
        let config = MapConfig::from_ini_str("[layer.floor]\ndisplay = Floor\n").unwrap();
        assert!(config.layer_settings.is_none());
        assert_eq!(config.strategy(), RenderStrategy::Image);
    }

    #[test]
    fn test_non_tiles_type_selects_image() {
        let config = MapConfig::from_ini_str("[layer_settings]\ntype = svg\n").unwrap();
        assert_eq!(config.strategy(), RenderStrategy::Image);
    }

    #[test]
    fn test_tiles_without_size_uses_default() {
        let config = MapConfig::from_ini_str("[layer_settings]\ntype = tiles\n").unwrap();
        assert_eq!(config.strategy(), RenderStrategy::tiles(DEFAULT_TILE_SIZE));
    }

    #[test]
    fn test_invalid_tile_size() {
        let result = MapConfig::from_ini_str("[layer_settings]\ntype = tiles\ntile_size = big\n");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue { ref key, .. } if key == "tile_size"
        ));

        let result = MapConfig::from_ini_str("[layer_settings]\ntype = tiles\ntile_size = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_layer_settings_require_type() {
        let result = MapConfig::from_ini_str("[layer_settings]\ntile_size = 256\n");
        assert!(matches!(result.unwrap_err(), ConfigError::MissingKey { .. }));
    }

    #[test]
    fn test_layer_section_requires_display() {
        let result = MapConfig::from_ini_str("[layer.floor]\nlabel = Floor\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("layer.floor"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL_CONFIG.as_bytes()).unwrap();

        let config = MapConfig::load(file.path()).unwrap();
        assert!(config.strategy().is_tiles());
        assert_eq!(config.layers.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = MapConfig::load(Path::new("/nonexistent/floormap.ini"));
        assert!(matches!(result.unwrap_err(), ConfigError::Load { .. }));
    }

    #[test]
    fn test_builder_pattern() {
        let config = MapConfig::default()
            .with_strategy(RenderStrategy::tiles(128))
            .with_layer("plumbing", "Plumbing")
            .with_asset_root("/srv/maps")
            .with_image_extension("webp");

        assert_eq!(config.strategy(), RenderStrategy::tiles(128));
        assert_eq!(config.display_label("plumbing"), Some("Plumbing"));
        assert_eq!(config.assets.root, "/srv/maps");
        assert_eq!(config.assets.image_extension, "webp");
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(RenderStrategy::tiles(256).to_string(), "tiles (256px)");
        assert_eq!(RenderStrategy::Image.to_string(), "image");
    }
}
