//! Floormap - layered web maps for multi-level facilities
//!
//! This library composes a building-style map (several floors, each with a
//! base visual and a set of toggle-able utility overlays) into renderable
//! layers, registers them with a layer-selection control, and keeps the
//! visible overlay entries in step with whichever level is selected.
//!
//! # Architecture
//!
//! ```text
//! MapConfig ──┐
//!             ├──► PathResolver ──► LayerFactory ──► BaseLayers / Overlays
//! MapDescription                                          │
//!                                                         ▼
//!                          MapView ◄──── Webmap ────► LayerControl
//!                             │                           ▲
//!                             └── base layer changed ──► OverlaySynchronizer
//! ```
//!
//! The display engine and the selection widget are external collaborators,
//! expressed as the [`MapView`] and [`LayerControl`] traits. The
//! [`headless`] module provides in-memory implementations of both.
//!
//! # Example
//!
//! ```
//! use floormap::headless::{HeadlessLayerControl, HeadlessMapView};
//! use floormap::{MapConfig, MapDescription, RenderStrategy, Webmap, WebmapOptions};
//!
//! let description = MapDescription::from_json_str(r#"{
//!     "name": "hq",
//!     "bounds": [[0, 0], [1000, 1000]],
//!     "layers": ["floor", "electrical"],
//!     "levels": { "L1": {}, "L2": { "underlays": ["basement"] } },
//!     "mainLevel": "L1"
//! }"#).unwrap();
//! let config = MapConfig::default().with_strategy(RenderStrategy::tiles(256));
//!
//! let options = WebmapOptions::new(
//!     HeadlessMapView::new(),
//!     HeadlessLayerControl::new(),
//!     config,
//!     description,
//! );
//! let webmap = Webmap::build(options).unwrap();
//! assert_eq!(webmap.active_level().as_deref(), Some("L1"));
//! ```

pub mod config;
pub mod description;
pub mod factory;
pub mod headless;
pub mod render;
pub mod resolver;
pub mod sync;
pub mod view;
pub mod webmap;

pub use config::{AssetConfig, ConfigError, LayerConfig, MapConfig, RenderStrategy};
pub use description::{DescriptionError, LatLng, LatLngBounds, Level, MapDescription};
pub use factory::{BaseLayers, LayerFactory, LevelOverlays, OverlayEntry, Overlays};
pub use render::{ImageOverlay, LayerGroup, LayerId, Pane, RenderError, Renderable, TileLayer};
pub use resolver::{ImagePathResolver, PathResolver, ResolveError, TiledPathResolver};
pub use sync::OverlaySynchronizer;
pub use view::{BaseLayerChange, BaseLayerListener, LayerControl, MapView};
pub use webmap::{Webmap, WebmapError, WebmapOptions, WebmapResult};
