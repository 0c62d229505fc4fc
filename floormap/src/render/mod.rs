//! Renderable layer primitives.
//!
//! These are the values handed to a [`MapView`](crate::MapView) and a
//! [`LayerControl`](crate::LayerControl). They describe *what* to draw
//! (a tile source, an image, a stack of either) without loading anything;
//! fetching tiles and images is the display engine's job.
//!
//! Every renderable carries a [`LayerId`] that is unique for the lifetime of
//! the process. Views and controls key their entries by it.

mod image;
mod tile;

pub use image::ImageOverlay;
pub use tile::{TileLayer, TILE_PLACEHOLDERS};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::description::LatLngBounds;

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Errors raised by renderable constructors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RenderError {
    /// Bounds are not finite or their corners are out of order.
    #[error("Invalid bounds {0}")]
    InvalidBounds(LatLngBounds),

    /// Tile URL template lacks a required placeholder.
    #[error("Tile template '{template}' is missing the {placeholder} placeholder")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },

    /// Tile size must be positive.
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),

    /// Native zoom above display zoom would request tiles that are never shown.
    #[error("Max native zoom {native} exceeds max zoom {max}")]
    InvalidZoomRange { max: u8, native: u8 },

    /// An image overlay needs a location to load from.
    #[error("Image location is empty")]
    EmptyLocation,
}

/// Process-unique identity of a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(u64);

impl LayerId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        LayerId(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Drawing pane of a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pane {
    /// Regular stacking.
    #[default]
    Default,
    /// Background visuals drawn beneath a level's primary visual.
    Underlay,
}

/// Ordered, fixed-membership stack of renderables, first one at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    id: LayerId,
    layers: Vec<Renderable>,
}

impl LayerGroup {
    pub fn new(layers: Vec<Renderable>) -> Self {
        Self {
            id: LayerId::next(),
            layers,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Members, bottom to top.
    pub fn layers(&self) -> &[Renderable] {
        &self.layers
    }

    /// The top-most member.
    pub fn top(&self) -> Option<&Renderable> {
        self.layers.last()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Anything a view can draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    Tiles(TileLayer),
    Image(ImageOverlay),
    Group(LayerGroup),
}

impl Renderable {
    pub fn id(&self) -> LayerId {
        match self {
            Renderable::Tiles(layer) => layer.id(),
            Renderable::Image(layer) => layer.id(),
            Renderable::Group(group) => group.id(),
        }
    }

    pub fn pane(&self) -> Pane {
        match self {
            Renderable::Tiles(layer) => layer.pane(),
            Renderable::Image(layer) => layer.pane(),
            Renderable::Group(_) => Pane::Default,
        }
    }

    /// Location the renderable loads from; `None` for groups.
    pub fn location(&self) -> Option<&str> {
        match self {
            Renderable::Tiles(layer) => Some(layer.url_template()),
            Renderable::Image(layer) => Some(layer.url()),
            Renderable::Group(_) => None,
        }
    }

    pub fn as_tiles(&self) -> Option<&TileLayer> {
        match self {
            Renderable::Tiles(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageOverlay> {
        match self {
            Renderable::Image(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&LayerGroup> {
        match self {
            Renderable::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Short kind name for logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Renderable::Tiles(_) => "tiles",
            Renderable::Image(_) => "image",
            Renderable::Group(_) => "group",
        }
    }
}

impl From<TileLayer> for Renderable {
    fn from(layer: TileLayer) -> Self {
        Renderable::Tiles(layer)
    }
}

impl From<ImageOverlay> for Renderable {
    fn from(layer: ImageOverlay) -> Self {
        Renderable::Image(layer)
    }
}

impl From<LayerGroup> for Renderable {
    fn from(group: LayerGroup) -> Self {
        Renderable::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::LatLng;

    fn bounds() -> LatLngBounds {
        LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(100.0, 100.0))
    }

    #[test]
    fn test_layer_ids_are_unique() {
        let a = LayerId::next();
        let b = LayerId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_group_keeps_order() {
        let bottom = ImageOverlay::new("a.png", bounds()).unwrap();
        let top = ImageOverlay::new("b.png", bounds()).unwrap();
        let top_id = top.id();

        let group = LayerGroup::new(vec![bottom.into(), top.into()]);

        assert_eq!(group.len(), 2);
        assert_eq!(group.layers()[0].location(), Some("a.png"));
        assert_eq!(group.top().map(Renderable::id), Some(top_id));
    }

    #[test]
    fn test_renderable_accessors() {
        let image: Renderable = ImageOverlay::new("a.png", bounds()).unwrap().into();
        assert_eq!(image.kind(), "image");
        assert!(image.as_image().is_some());
        assert!(image.as_tiles().is_none());

        let group: Renderable = LayerGroup::new(vec![image.clone()]).into();
        assert_eq!(group.kind(), "group");
        assert_eq!(group.location(), None);
        assert_eq!(group.pane(), Pane::Default);
        assert_ne!(group.id(), image.id());
    }
}
