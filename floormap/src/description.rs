//! Map descriptions.
//!
//! A [`MapDescription`] names a facility map, gives its bounds, the ordered
//! layer identifiers (the first one is the primary visual of every level, the
//! rest are overlays), and the levels with their underlay stacks.
//!
//! Descriptions are JSON documents:
//!
//! ```json
//! {
//!   "name": "hq",
//!   "bounds": [[0, 0], [1000, 1000]],
//!   "layers": ["floor", "electrical", "plumbing"],
//!   "levels": {
//!     "L1": { "underlays": [] },
//!     "L2": { "underlays": ["basement"] }
//!   },
//!   "mainLevel": "L1"
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a map description.
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// Failed to read the description file.
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The description is not valid JSON or does not match the schema.
    #[error("Invalid map description: {0}")]
    Json(#[from] serde_json::Error),

    /// The description lists no layers, so levels have no primary visual.
    #[error("Map '{0}' declares no layers")]
    NoLayers(String),
}

/// A point in the map's coordinate space.
///
/// For geographic maps this is latitude/longitude; for floor plans drawn in
/// pixel space it is row/column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lat, self.lng)
    }
}

/// Rectangular extent given by its south-west and north-east corners.
///
/// Serialized as `[[south, west], [north, east]]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "[[f64; 2]; 2]")]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Create bounds from two corners without validating them.
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Whether all coordinates are finite and the corners are ordered.
    pub fn is_valid(&self) -> bool {
        let coords = [
            self.south_west.lat,
            self.south_west.lng,
            self.north_east.lat,
            self.north_east.lng,
        ];
        coords.iter().all(|c| c.is_finite())
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }
}

impl TryFrom<[[f64; 2]; 2]> for LatLngBounds {
    type Error = String;

    fn try_from(corners: [[f64; 2]; 2]) -> Result<Self, Self::Error> {
        let [[south, west], [north, east]] = corners;
        let bounds = LatLngBounds::new(LatLng::new(south, west), LatLng::new(north, east));
        if bounds.is_valid() {
            Ok(bounds)
        } else {
            Err(format!("invalid bounds {}", bounds))
        }
    }
}

impl fmt::Display for LatLngBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.south_west, self.north_east)
    }
}

/// One selectable floor of the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Level {
    /// Visuals stacked beneath this level's primary visual, bottom first.
    #[serde(default)]
    pub underlays: Vec<String>,
}

impl Level {
    pub fn with_underlays<I, S>(underlays: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            underlays: underlays.into_iter().map(Into::into).collect(),
        }
    }
}

/// Description of a multi-level map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDescription {
    /// Map identifier, passed to the path resolver.
    pub name: String,

    /// Pan limit and initial view; also the extent of every image and tile layer.
    pub bounds: LatLngBounds,

    /// Layer identifiers: primary visual first, then overlays in z-order.
    pub layers: Vec<String>,

    /// Levels by name.
    pub levels: BTreeMap<String, Level>,

    /// Level shown when the map first opens.
    #[serde(default)]
    pub main_level: Option<String>,
}

impl MapDescription {
    /// Create a description with no levels.
    pub fn new<I, S>(name: impl Into<String>, bounds: LatLngBounds, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            bounds,
            layers: layers.into_iter().map(Into::into).collect(),
            levels: BTreeMap::new(),
            main_level: None,
        }
    }

    /// Parse and validate a description from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DescriptionError> {
        let description: MapDescription = serde_json::from_str(text)?;
        description.validate()?;
        Ok(description)
    }

    /// Load and validate a description from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DescriptionError> {
        let text = std::fs::read_to_string(path).map_err(|source| DescriptionError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), DescriptionError> {
        if self.layers.is_empty() {
            return Err(DescriptionError::NoLayers(self.name.clone()));
        }
        Ok(())
    }

    /// The layer identifier of every level's primary visual.
    pub fn primary_layer(&self) -> Option<&str> {
        self.layers.first().map(String::as_str)
    }

    /// Overlay layer identifiers, everything after the primary layer.
    pub fn overlay_layers(&self) -> &[String] {
        self.layers.get(1..).unwrap_or(&[])
    }

    /// Add a level.
    pub fn with_level(mut self, name: impl Into<String>, level: Level) -> Self {
        self.levels.insert(name.into(), level);
        self
    }

    /// Set the level shown on startup.
    pub fn with_main_level(mut self, name: impl Into<String>) -> Self {
        self.main_level = Some(name.into());
        self
    }
}
