//! Contracts for the display engine and the layer-selection control.
//!
//! The composition engine never draws anything itself. It talks to a
//! [`MapView`] (pan/zoom surface that shows renderables) and a
//! [`LayerControl`] (widget listing exclusive base-layer choices and
//! independent overlay toggles). Hosts implement both for their display
//! stack; [`headless`](crate::headless) implements them in memory.
//!
//! # Threading
//!
//! Views are single-threaded. A [`BaseLayerListener`] is invoked on the
//! view's event loop and runs to completion before the next event is
//! delivered, so listeners need neither `Send` nor locking.

use crate::description::LatLngBounds;
use crate::render::{LayerId, Renderable};

/// Notification that the user picked a different base layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseLayerChange {
    /// Label the base layer was registered under (the level name).
    pub name: String,

    /// Identity of the newly selected base layer.
    pub layer: Option<LayerId>,
}

impl BaseLayerChange {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer: None,
        }
    }

    pub fn with_layer(mut self, layer: LayerId) -> Self {
        self.layer = Some(layer);
        self
    }
}

/// Callback for base-layer changes.
pub type BaseLayerListener = Box<dyn FnMut(&BaseLayerChange)>;

/// Interactive map surface.
pub trait MapView {
    /// Restrict panning to the given bounds.
    fn set_max_bounds(&mut self, bounds: LatLngBounds);

    /// Zoom and pan so the given bounds fill the view.
    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Show a renderable.
    fn add_layer(&mut self, layer: &Renderable);

    /// Stop showing a renderable. Unknown ids are ignored.
    fn remove_layer(&mut self, id: LayerId);

    /// Text shown before the attribution entries.
    fn set_attribution_prefix(&mut self, prefix: &str);

    /// Register a listener for base-layer changes.
    ///
    /// No ordering between multiple listeners is guaranteed.
    fn on_base_layer_change(&mut self, listener: BaseLayerListener);
}

/// Layer-selection control.
///
/// Base-layer entries are mutually exclusive; overlay entries toggle
/// independently and any number may be visible at once.
pub trait LayerControl {
    /// Attach the control to a view.
    fn add_to(&mut self, view: &mut dyn MapView);

    /// Register a base-layer entry.
    fn add_base_layer(&mut self, layer: &Renderable, label: &str);

    /// Register an overlay entry.
    fn add_overlay(&mut self, layer: &Renderable, label: &str);

    /// Unregister every entry for a renderable. Unknown ids are ignored.
    fn remove_layer(&mut self, id: LayerId);
}
