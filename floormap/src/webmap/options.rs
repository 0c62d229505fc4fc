//! Construction options for [`Webmap`](super::Webmap).

use crate::config::MapConfig;
use crate::description::MapDescription;
use crate::render::Renderable;
use crate::resolver::PathResolver;
use crate::view::{LayerControl, MapView};

/// Everything needed to build a [`Webmap`](super::Webmap).
///
/// Setters only assign fields; all behavior lives in
/// [`Webmap::build`](super::Webmap::build).
pub struct WebmapOptions<V, C> {
    /// Display surface.
    pub view: V,

    /// Layer-selection control, attached to `view` on construction.
    pub control: C,

    pub config: MapConfig,

    pub description: MapDescription,

    /// Overrides the resolver chosen from the render strategy.
    pub path_resolver: Option<Box<dyn PathResolver>>,

    /// Text shown before the view's attribution entries.
    pub attribution_prefix: Option<String>,

    /// Layers added to the view as-is, outside level management.
    pub extra_layers: Vec<Renderable>,
}

impl<V, C> WebmapOptions<V, C>
where
    V: MapView,
    C: LayerControl + 'static,
{
    pub fn new(view: V, control: C, config: MapConfig, description: MapDescription) -> Self {
        Self {
            view,
            control,
            config,
            description,
            path_resolver: None,
            attribution_prefix: None,
            extra_layers: Vec::new(),
        }
    }

    /// Use a custom path resolver.
    pub fn with_path_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.path_resolver = Some(Box::new(resolver));
        self
    }

    /// Set the attribution prefix.
    pub fn with_attribution_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attribution_prefix = Some(prefix.into());
        self
    }

    /// Add a layer outside level management.
    pub fn with_extra_layer(mut self, layer: impl Into<Renderable>) -> Self {
        self.extra_layers.push(layer.into());
        self
    }
}
