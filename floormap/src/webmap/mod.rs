//! The composition engine.
//!
//! A [`Webmap`] owns the view, the control and the built layers of one map.
//! It moves through two phases:
//!
//! ```text
//! ┌─────────────┐  initialize()  ┌──────────────────────────────┐
//! │ Constructed │ ─────────────► │ Active                       │
//! │ control     │                │ base layers registered       │
//! │ attached    │                │ main level shown             │
//! └─────────────┘                │ overlays synced on change ◄─┐│
//!                                └─────────────────────────────┼┘
//!                                      base layer changed ─────┘
//! ```
//!
//! Initialization is single-shot: calling [`Webmap::initialize`] on an
//! active engine returns [`WebmapError::AlreadyInitialized`] and leaves the
//! control untouched.
//!
//! # Example
//!
//! ```ignore
//! use floormap::{Webmap, WebmapOptions};
//!
//! let webmap = Webmap::build(
//!     WebmapOptions::new(view, control, config, description)
//!         .with_attribution_prefix("Facilities")
//!         .with_path_resolver(cdn_resolver),
//! )?;
//! ```

mod error;
mod options;

pub use error::{WebmapError, WebmapResult};
pub use options::WebmapOptions;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::description::MapDescription;
use crate::factory::{BaseLayers, LayerFactory, Overlays};
use crate::resolver::{self, PathResolver};
use crate::sync::OverlaySynchronizer;
use crate::view::{BaseLayerChange, LayerControl, MapView};

/// Layers and live selection state of an initialized map.
struct Composition {
    base_layers: BaseLayers,
    synchronizer: OverlaySynchronizer,
    active_level: Rc<RefCell<Option<String>>>,
}

enum Phase {
    Constructed,
    Active(Composition),
}

/// Level/layer composition engine for one map.
pub struct Webmap<V, C>
where
    V: MapView,
    C: LayerControl + 'static,
{
    view: V,
    control: Rc<RefCell<C>>,
    config: MapConfig,
    description: MapDescription,
    resolver: Box<dyn PathResolver>,
    phase: Phase,
}

impl<V, C> Webmap<V, C>
where
    V: MapView,
    C: LayerControl + 'static,
{
    /// Creates an engine and attaches the (empty) control to the view.
    ///
    /// Without a custom resolver, the built-in resolver for the configured
    /// render strategy is used.
    pub fn new(
        mut view: V,
        mut control: C,
        config: MapConfig,
        description: MapDescription,
        path_resolver: Option<Box<dyn PathResolver>>,
    ) -> Self {
        let resolver = path_resolver.unwrap_or_else(|| resolver::for_config(&config));
        control.add_to(&mut view);

        info!(
            map = %description.name,
            levels = description.levels.len(),
            strategy = %config.strategy(),
            resolver = resolver.name(),
            "Created webmap"
        );

        Self {
            view,
            control: Rc::new(RefCell::new(control)),
            config,
            description,
            resolver,
            phase: Phase::Constructed,
        }
    }

    /// Constructs, applies the extra options, and initializes.
    pub fn build(options: WebmapOptions<V, C>) -> WebmapResult<Self> {
        let WebmapOptions {
            view,
            control,
            config,
            description,
            path_resolver,
            attribution_prefix,
            extra_layers,
        } = options;

        let mut webmap = Self::new(view, control, config, description, path_resolver);
        if let Some(prefix) = attribution_prefix {
            webmap.view.set_attribution_prefix(&prefix);
        }
        for layer in &extra_layers {
            webmap.view.add_layer(layer);
        }

        webmap.initialize()?;
        Ok(webmap)
    }

    /// Builds all layers, registers them, and activates the main level.
    ///
    /// Layers are built before anything is registered, so a resolver or
    /// renderable failure leaves the engine constructed with an empty
    /// control.
    pub fn initialize(&mut self) -> WebmapResult<()> {
        if matches!(self.phase, Phase::Active(_)) {
            return Err(WebmapError::AlreadyInitialized(
                self.description.name.clone(),
            ));
        }

        let bounds = self.description.bounds;
        self.view.set_max_bounds(bounds);
        self.view.fit_bounds(bounds);

        let factory = LayerFactory::new(&self.description, &self.config, &*self.resolver);
        let base_layers = factory.build_base_layers()?;
        let overlays: Rc<Overlays> = Rc::new(factory.build_overlays()?);

        {
            let mut control = self.control.borrow_mut();
            for (level, layer) in base_layers.iter() {
                control.add_base_layer(layer, level);
            }
        }

        let synchronizer = OverlaySynchronizer::new(overlays);
        let active_level = Rc::new(RefCell::new(None));

        let main_level = self.description.main_level.as_deref();
        match main_level.and_then(|name| base_layers.get_key_value(name)) {
            Some((level, layer)) => {
                synchronizer.sync(&mut *self.control.borrow_mut(), level);
                self.view.add_layer(layer);
                *active_level.borrow_mut() = Some(level.to_string());
            }
            None => {
                warn!(
                    map = %self.description.name,
                    main_level = main_level.unwrap_or("<none>"),
                    "Main level not found - no level activated"
                );
            }
        }

        let listener_sync = synchronizer.clone();
        let listener_control = Rc::clone(&self.control);
        let listener_active = Rc::clone(&active_level);
        self.view
            .on_base_layer_change(Box::new(move |change: &BaseLayerChange| {
                match change.layer {
                    Some(layer) => {
                        debug!(level = %change.name, layer = %layer, "Base layer changed")
                    }
                    None => debug!(level = %change.name, "Base layer changed"),
                }
                listener_sync.sync(&mut *listener_control.borrow_mut(), &change.name);
                let known = listener_sync.overlays().get(&change.name).is_some();
                *listener_active.borrow_mut() = known.then(|| change.name.clone());
            }));

        info!(
            map = %self.description.name,
            base_layers = base_layers.len(),
            active_level = active_level.borrow().as_deref().unwrap_or("<none>"),
            "Initialized webmap"
        );

        self.phase = Phase::Active(Composition {
            base_layers,
            synchronizer,
            active_level,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable view access, for hosts that dispatch events through it.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Borrow the layer control.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a base-layer listener.
    pub fn control(&self) -> Ref<'_, C> {
        self.control.borrow()
    }

    pub fn description(&self) -> &MapDescription {
        &self.description
    }

    pub fn map_name(&self) -> &str {
        &self.description.name
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn path_resolver(&self) -> &dyn PathResolver {
        &*self.resolver
    }

    /// Base layers by level; `None` before initialization.
    pub fn base_layers(&self) -> Option<&BaseLayers> {
        match &self.phase {
            Phase::Active(composition) => Some(&composition.base_layers),
            Phase::Constructed => None,
        }
    }

    /// Overlays by level; `None` before initialization.
    pub fn overlays(&self) -> Option<&Overlays> {
        match &self.phase {
            Phase::Active(composition) => Some(composition.synchronizer.overlays()),
            Phase::Constructed => None,
        }
    }

    /// The currently selected level, if any.
    pub fn active_level(&self) -> Option<String> {
        match &self.phase {
            Phase::Active(composition) => composition.active_level.borrow().clone(),
            Phase::Constructed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderStrategy;
    use crate::description::{LatLng, LatLngBounds, Level};
    use crate::headless::{HeadlessLayerControl, HeadlessMapView};
    use crate::render::ImageOverlay;
    use crate::resolver::ResolveError;

    fn bounds() -> LatLngBounds {
        LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(500.0, 800.0))
    }

    fn description() -> MapDescription {
        MapDescription::new("hq", bounds(), ["floor", "electrical"])
            .with_level("L1", Level::default())
            .with_level("L2", Level::with_underlays(["basement"]))
            .with_main_level("L1")
    }

    fn webmap(description: MapDescription) -> Webmap<HeadlessMapView, HeadlessLayerControl> {
        let config = MapConfig::default()
            .with_strategy(RenderStrategy::tiles(256))
            .with_layer("electrical", "Electrical");
        Webmap::new(
            HeadlessMapView::new(),
            HeadlessLayerControl::new(),
            config,
            description,
            None,
        )
    }

    #[test]
    fn test_new_attaches_control_without_layers() {
        let webmap = webmap(description());

        assert!(webmap.control().is_attached());
        assert!(webmap.control().entries().is_empty());
        assert!(!webmap.is_initialized());
        assert!(webmap.base_layers().is_none());
        assert!(webmap.overlays().is_none());
        assert_eq!(webmap.active_level(), None);
        assert_eq!(webmap.map_name(), "hq");
        assert_eq!(webmap.path_resolver().name(), "tiled");
    }

    #[test]
    fn test_initialize_sets_bounds_and_registers_base_layers() {
        let mut webmap = webmap(description());
        webmap.initialize().unwrap();

        assert_eq!(webmap.view().max_bounds(), Some(bounds()));
        assert_eq!(webmap.view().fitted_bounds(), Some(bounds()));
        assert_eq!(webmap.control().base_labels(), ["L1", "L2"]);
        assert_eq!(webmap.view().listener_count(), 1);
    }

    #[test]
    fn test_initialize_activates_main_level() {
        let mut webmap = webmap(description());
        webmap.initialize().unwrap();

        let l1 = webmap.base_layers().unwrap().get("L1").unwrap().id();
        assert!(webmap.view().has_layer(l1));
        assert_eq!(webmap.view().layers().len(), 1);
        assert_eq!(webmap.active_level().as_deref(), Some("L1"));
        assert_eq!(webmap.control().overlay_labels(), ["Electrical"]);
    }

    #[test]
    fn test_unknown_main_level_activates_nothing() {
        let mut webmap = webmap(description().with_main_level("roof"));
        webmap.initialize().unwrap();

        assert!(webmap.view().layers().is_empty());
        assert!(webmap.control().overlay_labels().is_empty());
        assert_eq!(webmap.control().base_labels().len(), 2);
        assert_eq!(webmap.active_level(), None);
    }

    #[test]
    fn test_double_initialize_is_rejected() {
        let mut webmap = webmap(description());
        webmap.initialize().unwrap();
        let entries_before = webmap.control().entries().to_vec();

        let err = webmap.initialize().unwrap_err();
        assert!(matches!(err, WebmapError::AlreadyInitialized(_)));
        assert_eq!(webmap.control().entries(), entries_before.as_slice());
        assert_eq!(webmap.view().listener_count(), 1);
    }

    #[test]
    fn test_base_layer_change_switches_overlays() {
        let mut webmap = webmap(description());
        webmap.initialize().unwrap();
        let l1_overlays: Vec<_> = webmap.control().overlay_ids();

        webmap
            .view_mut()
            .emit_base_layer_change(&BaseLayerChange::new("L2"));

        let l2_ids: Vec<_> = webmap
            .overlays()
            .unwrap()
            .get("L2")
            .unwrap()
            .iter()
            .map(|e| e.layer.id())
            .collect();
        assert_eq!(webmap.control().overlay_ids(), l2_ids);
        assert!(webmap
            .control()
            .overlay_ids()
            .iter()
            .all(|id| !l1_overlays.contains(id)));
        assert_eq!(webmap.active_level().as_deref(), Some("L2"));
    }

    #[test]
    fn test_failed_initialize_registers_nothing() {
        let failing = |_: &str, _: &str, _: &str| -> Result<String, ResolveError> {
            Err(ResolveError::Other("offline".to_string()))
        };
        let mut webmap = Webmap::new(
            HeadlessMapView::new(),
            HeadlessLayerControl::new(),
            MapConfig::default(),
            description(),
            Some(Box::new(failing)),
        );

        assert!(matches!(
            webmap.initialize().unwrap_err(),
            WebmapError::Resolve { .. }
        ));
        assert!(!webmap.is_initialized());
        assert!(webmap.control().entries().is_empty());
        assert_eq!(webmap.view().listener_count(), 0);
    }

    #[test]
    fn test_build_applies_options() {
        let extra = ImageOverlay::new("logo.png", bounds()).unwrap();
        let extra_id = extra.id();
        let options = WebmapOptions::new(
            HeadlessMapView::new(),
            HeadlessLayerControl::new(),
            MapConfig::default(),
            description(),
        )
        .with_attribution_prefix("Facilities")
        .with_extra_layer(extra);

        let webmap = Webmap::build(options).unwrap();

        assert!(webmap.is_initialized());
        assert_eq!(webmap.view().attribution_prefix(), Some("Facilities"));
        assert!(webmap.view().has_layer(extra_id));
        assert_eq!(webmap.view().layers().len(), 2);
    }
}
