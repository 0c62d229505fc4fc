//! Layer construction.
//!
//! The [`LayerFactory`] turns a [`MapDescription`] into renderables:
//!
//! ```text
//! level L2 (underlays: [basement])          overlays of L2
//! ┌───────────────────────────────┐         ┌──────────────────────────┐
//! │ LayerGroup                    │         │ "Electrical" → electrical│
//! │  ├── basement/floor (underlay)│         │ "Plumbing"   → plumbing  │
//! │  └── L2/floor       (primary) │         └──────────────────────────┘
//! └───────────────────────────────┘
//! ```
//!
//! Underlays are always resolved against the primary layer identifier
//! (`layers[0]`), with the underlay name taking the place of the level.
//! Overlays are resolved per level for every identifier in `layers[1..]`.
//!
//! # Render Parameters
//!
//! | Strategy | Base layers                         | Overlays                      |
//! |----------|-------------------------------------|-------------------------------|
//! | Tiles    | max zoom 4, configured tile size    | max zoom 4, 1024px tiles      |
//! | Image    | image bounded to the map bounds     | image bounded to the map bounds|

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::{MapConfig, RenderStrategy};
use crate::description::MapDescription;
use crate::render::{ImageOverlay, LayerGroup, Pane, Renderable, TileLayer};
use crate::resolver::{PathResolver, TILE_SUFFIX};
use crate::webmap::{WebmapError, WebmapResult};

/// Display and native zoom cap of every tile layer.
pub const MAX_ZOOM: u8 = 4;

/// Tile size of overlay tile layers, independent of configuration.
pub const OVERLAY_TILE_SIZE: u32 = 1024;

/// What a visual is used for; decides pane and tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Underlay,
    Primary,
    Overlay,
}

impl Role {
    fn pane(self) -> Pane {
        match self {
            Role::Underlay => Pane::Underlay,
            Role::Primary | Role::Overlay => Pane::Default,
        }
    }

    fn tile_size(self, configured: u32) -> u32 {
        match self {
            Role::Overlay => OVERLAY_TILE_SIZE,
            Role::Underlay | Role::Primary => configured,
        }
    }
}

/// One composite base layer per level, keyed by level name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseLayers {
    layers: BTreeMap<String, Renderable>,
}

impl BaseLayers {
    pub fn get(&self, level: &str) -> Option<&Renderable> {
        self.layers.get(level)
    }

    /// Registered level name and base layer for a level.
    pub fn get_key_value(&self, level: &str) -> Option<(&str, &Renderable)> {
        self.layers
            .get_key_value(level)
            .map(|(name, layer)| (name.as_str(), layer))
    }

    pub fn contains(&self, level: &str) -> bool {
        self.layers.contains_key(level)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Renderable)> {
        self.layers.iter().map(|(name, layer)| (name.as_str(), layer))
    }

    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// One overlay of one level.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEntry {
    /// Control label, the configured display name.
    pub label: String,

    /// Layer identifier from the map description.
    pub layer_name: String,

    pub layer: Renderable,
}

/// Overlays of one level, in layer order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelOverlays {
    entries: Vec<OverlayEntry>,
}

impl LevelOverlays {
    /// Overlay registered under a display label.
    pub fn get(&self, label: &str) -> Option<&Renderable> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.layer)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Overlays of every level, keyed by level name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlays {
    levels: BTreeMap<String, LevelOverlays>,
}

impl Overlays {
    pub fn get(&self, level: &str) -> Option<&LevelOverlays> {
        self.levels.get(level)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LevelOverlays)> {
        self.levels.iter().map(|(name, overlays)| (name.as_str(), overlays))
    }

    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    /// Every overlay of every level.
    pub fn entries(&self) -> impl Iterator<Item = &OverlayEntry> {
        self.levels.values().flat_map(|overlays| overlays.iter())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Builds base layers and overlays for one map description.
pub struct LayerFactory<'a> {
    description: &'a MapDescription,
    config: &'a MapConfig,
    resolver: &'a dyn PathResolver,
}

impl<'a> LayerFactory<'a> {
    pub fn new(
        description: &'a MapDescription,
        config: &'a MapConfig,
        resolver: &'a dyn PathResolver,
    ) -> Self {
        Self {
            description,
            config,
            resolver,
        }
    }

    /// Builds one underlay + primary group per level.
    pub fn build_base_layers(&self) -> WebmapResult<BaseLayers> {
        let primary = self
            .description
            .primary_layer()
            .ok_or_else(|| WebmapError::NoPrimaryLayer(self.description.name.clone()))?;

        let mut layers = BTreeMap::new();
        for (level_name, level) in &self.description.levels {
            let mut stack = Vec::with_capacity(level.underlays.len() + 1);
            for underlay in &level.underlays {
                stack.push(self.build_visual(underlay, primary, Role::Underlay)?);
            }
            stack.push(self.build_visual(level_name, primary, Role::Primary)?);

            debug!(
                level = %level_name,
                underlays = level.underlays.len(),
                "Built base layer"
            );
            layers.insert(level_name.clone(), LayerGroup::new(stack).into());
        }

        Ok(BaseLayers { layers })
    }

    /// Builds every overlay of every level, labelled by display name.
    ///
    /// Labels are unique within a level: when two layers share a display
    /// label the later layer takes the earlier one's slot.
    pub fn build_overlays(&self) -> WebmapResult<Overlays> {
        let mut levels = BTreeMap::new();
        for level_name in self.description.levels.keys() {
            let mut entries: Vec<OverlayEntry> = Vec::with_capacity(self.description.overlay_layers().len());
            for layer_name in self.description.overlay_layers() {
                let layer = self.build_visual(level_name, layer_name, Role::Overlay)?;
                let entry = OverlayEntry {
                    label: self.label_for(layer_name),
                    layer_name: layer_name.clone(),
                    layer,
                };

                // Labels key the control; a repeated label replaces the earlier entry in place.
                match entries.iter_mut().find(|e| e.label == entry.label) {
                    Some(existing) => {
                        warn!(
                            level = %level_name,
                            label = %entry.label,
                            replaced = %existing.layer_name,
                            layer = %layer_name,
                            "Duplicate overlay label - later layer wins"
                        );
                        *existing = entry;
                    }
                    None => entries.push(entry),
                }
            }
            levels.insert(level_name.clone(), LevelOverlays { entries });
        }

        Ok(Overlays { levels })
    }

    fn label_for(&self, layer_name: &str) -> String {
        match self.config.display_label(layer_name) {
            Some(display) => display.to_string(),
            None => {
                warn!(
                    layer = %layer_name,
                    "No display label configured - using layer identifier"
                );
                layer_name.to_string()
            }
        }
    }

    fn build_visual(&self, level: &str, layer: &str, role: Role) -> WebmapResult<Renderable> {
        let location = self
            .resolver
            .resolve(&self.description.name, level, layer)
            .map_err(|source| WebmapError::Resolve {
                level: level.to_string(),
                layer: layer.to_string(),
                source,
            })?;

        let bounds = self.description.bounds;
        let built: Result<Renderable, _> = match self.config.strategy() {
            RenderStrategy::Tiles { tile_size } => TileLayer::new(
                format!("{}{}", location, TILE_SUFFIX),
                bounds,
                MAX_ZOOM,
                MAX_ZOOM,
                role.tile_size(tile_size),
            )
            .map(|tiles| tiles.in_pane(role.pane()).into()),
            RenderStrategy::Image => ImageOverlay::new(location, bounds)
                .map(|image| image.in_pane(role.pane()).into()),
        };

        let renderable = built.map_err(|source| WebmapError::Render {
            level: level.to_string(),
            layer: layer.to_string(),
            source,
        })?;

        debug!(
            level = %level,
            layer = %layer,
            kind = renderable.kind(),
            location = renderable.location().unwrap_or_default(),
            resolver = self.resolver.name(),
            "Built layer"
        );
        Ok(renderable)
    }
}
