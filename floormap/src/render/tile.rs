//! Tiled raster layers.
//!
//! # URL Template
//!
//! Tiles are addressed by standard XYZ coordinates substituted into a
//! template, e.g. `maps/hq/L1/floor/{z}/{x}/{y}.png`:
//! - `{z}`: zoom level
//! - `{x}`: column (west to east)
//! - `{y}`: row (north to south)

use super::{LayerId, Pane, RenderError};
use crate::description::LatLngBounds;

/// Placeholders every tile template must contain.
pub const TILE_PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

/// A raster layer assembled from zoom/x/y tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    id: LayerId,
    url_template: String,
    bounds: LatLngBounds,
    max_zoom: u8,
    max_native_zoom: u8,
    tile_size: u32,
    pane: Pane,
}

impl TileLayer {
    /// Creates a tile layer in the default pane.
    ///
    /// # Arguments
    ///
    /// * `url_template` - Location with `{z}`, `{x}` and `{y}` placeholders
    /// * `bounds` - Area outside which no tiles are requested
    /// * `max_zoom` - Highest zoom level the layer is displayed at
    /// * `max_native_zoom` - Highest zoom level tiles exist for
    /// * `tile_size` - Edge length of one tile in pixels
    pub fn new(
        url_template: impl Into<String>,
        bounds: LatLngBounds,
        max_zoom: u8,
        max_native_zoom: u8,
        tile_size: u32,
    ) -> Result<Self, RenderError> {
        let url_template = url_template.into();

        if let Some(placeholder) = TILE_PLACEHOLDERS
            .into_iter()
            .find(|p| !url_template.contains(p))
        {
            return Err(RenderError::MissingPlaceholder {
                template: url_template,
                placeholder,
            });
        }
        if !bounds.is_valid() {
            return Err(RenderError::InvalidBounds(bounds));
        }
        if tile_size == 0 {
            return Err(RenderError::InvalidTileSize(tile_size));
        }
        if max_native_zoom > max_zoom {
            return Err(RenderError::InvalidZoomRange {
                max: max_zoom,
                native: max_native_zoom,
            });
        }

        Ok(Self {
            id: LayerId::next(),
            url_template,
            bounds,
            max_zoom,
            max_native_zoom,
            tile_size,
            pane: Pane::Default,
        })
    }

    /// Move the layer to another pane.
    pub fn in_pane(mut self, pane: Pane) -> Self {
        self.pane = pane;
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn bounds(&self) -> LatLngBounds {
        self.bounds
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn max_native_zoom(&self) -> u8 {
        self.max_native_zoom
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    /// Builds the URL of one tile.
    pub fn tile_url(&self, zoom: u8, col: u32, row: u32) -> String {
        self.url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &col.to_string())
            .replace("{y}", &row.to_string())
    }
}
