//! In-memory map view and layer control.
//!
//! [`HeadlessMapView`] and [`HeadlessLayerControl`] record every call made
//! to them instead of drawing. They back the CLI preview and make the
//! composition engine testable without a display engine.
//!
//! A user picking a level is simulated in two steps, because the control
//! is borrowed by the engine's listener while the change is delivered:
//!
//! 1. [`HeadlessLayerControl::select_base`] looks the label up among the
//!    base entries and records which layers the pick replaces
//! 2. [`HeadlessMapView::select_base_layer`] swaps the shown base layer and
//!    notifies listeners
//!
//! [`Webmap::select_level`] runs both against an engine.

use std::fmt;

use crate::description::LatLngBounds;
use crate::render::{LayerId, Renderable};
use crate::view::{BaseLayerChange, BaseLayerListener, LayerControl, MapView};
use crate::webmap::Webmap;

/// Kind of a control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Mutually exclusive base-layer choice.
    Base,
    /// Independently toggle-able overlay.
    Overlay,
}

/// One entry listed by a control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlEntry {
    pub id: LayerId,
    pub label: String,
    pub kind: EntryKind,
    pub layer: Renderable,
}

/// A base-layer pick taken from a control's entries.
#[derive(Debug, Clone)]
pub struct BaseSelection {
    label: String,
    layer: Renderable,
    replaced: Vec<LayerId>,
}

impl BaseSelection {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layer(&self) -> &Renderable {
        &self.layer
    }

    /// Every other base layer of the control; at most one may be shown.
    pub fn replaced(&self) -> &[LayerId] {
        &self.replaced
    }
}

/// Layer control that keeps its entries in a list.
#[derive(Debug, Default)]
pub struct HeadlessLayerControl {
    attached: bool,
    entries: Vec<ControlEntry>,
}

impl HeadlessLayerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`LayerControl::add_to`] was called.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[ControlEntry] {
        &self.entries
    }

    pub fn base_labels(&self) -> Vec<&str> {
        self.labels(EntryKind::Base)
    }

    pub fn overlay_labels(&self) -> Vec<&str> {
        self.labels(EntryKind::Overlay)
    }

    pub fn overlay_ids(&self) -> Vec<LayerId> {
        self.entries
            .iter()
            .filter(|e| e.kind == EntryKind::Overlay)
            .map(|e| e.id)
            .collect()
    }

    /// Base entry registered under a label.
    pub fn base_entry(&self, label: &str) -> Option<&ControlEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == EntryKind::Base && e.label == label)
    }

    /// Prepare picking the base layer registered under `label`.
    pub fn select_base(&self, label: &str) -> Option<BaseSelection> {
        let selected = self.base_entry(label)?;
        let replaced = self
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Base && e.id != selected.id)
            .map(|e| e.id)
            .collect();

        Some(BaseSelection {
            label: selected.label.clone(),
            layer: selected.layer.clone(),
            replaced,
        })
    }

    fn labels(&self, kind: EntryKind) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.label.as_str())
            .collect()
    }

    fn push(&mut self, layer: &Renderable, label: &str, kind: EntryKind) {
        self.entries.push(ControlEntry {
            id: layer.id(),
            label: label.to_string(),
            kind,
            layer: layer.clone(),
        });
    }
}

impl LayerControl for HeadlessLayerControl {
    fn add_to(&mut self, _view: &mut dyn MapView) {
        self.attached = true;
    }

    fn add_base_layer(&mut self, layer: &Renderable, label: &str) {
        self.push(layer, label, EntryKind::Base);
    }

    fn add_overlay(&mut self, layer: &Renderable, label: &str) {
        self.push(layer, label, EntryKind::Overlay);
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.entries.retain(|e| e.id != id);
    }
}

/// Map view that records bounds, layers and listeners.
#[derive(Default)]
pub struct HeadlessMapView {
    max_bounds: Option<LatLngBounds>,
    fitted_bounds: Option<LatLngBounds>,
    layers: Vec<Renderable>,
    attribution_prefix: Option<String>,
    listeners: Vec<BaseLayerListener>,
}

impl HeadlessMapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_bounds(&self) -> Option<LatLngBounds> {
        self.max_bounds
    }

    pub fn fitted_bounds(&self) -> Option<LatLngBounds> {
        self.fitted_bounds
    }

    /// Layers currently shown, in the order they were added.
    pub fn layers(&self) -> &[Renderable] {
        &self.layers
    }

    pub fn has_layer(&self, id: LayerId) -> bool {
        self.layers.iter().any(|l| l.id() == id)
    }

    pub fn attribution_prefix(&self) -> Option<&str> {
        self.attribution_prefix.as_deref()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver a base-layer change to every listener.
    ///
    /// Shown layers are left untouched; [`select_base_layer`](Self::select_base_layer)
    /// performs the full pick.
    pub fn emit_base_layer_change(&mut self, change: &BaseLayerChange) {
        for listener in self.listeners.iter_mut() {
            listener(change);
        }
    }

    /// Show the selected base layer in place of the others, then notify.
    pub fn select_base_layer(&mut self, selection: &BaseSelection) {
        for id in selection.replaced() {
            self.remove_layer(*id);
        }
        self.add_layer(selection.layer());

        let change = BaseLayerChange::new(selection.label()).with_layer(selection.layer().id());
        self.emit_base_layer_change(&change);
    }
}

impl fmt::Debug for HeadlessMapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessMapView")
            .field("max_bounds", &self.max_bounds)
            .field("fitted_bounds", &self.fitted_bounds)
            .field("layers", &self.layers.len())
            .field("attribution_prefix", &self.attribution_prefix)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MapView for HeadlessMapView {
    fn set_max_bounds(&mut self, bounds: LatLngBounds) {
        self.max_bounds = Some(bounds);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.fitted_bounds = Some(bounds);
    }

    fn add_layer(&mut self, layer: &Renderable) {
        if !self.has_layer(layer.id()) {
            self.layers.push(layer.clone());
        }
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.retain(|l| l.id() != id);
    }

    fn set_attribution_prefix(&mut self, prefix: &str) {
        self.attribution_prefix = Some(prefix.to_string());
    }

    fn on_base_layer_change(&mut self, listener: BaseLayerListener) {
        self.listeners.push(listener);
    }
}

impl Webmap<HeadlessMapView, HeadlessLayerControl> {
    /// Pick a level in the control, as a user would.
    ///
    /// Returns `false` if the control lists no base layer under `level`.
    pub fn select_level(&mut self, level: &str) -> bool {
        let Some(selection) = self.control().select_base(level) else {
            return false;
        };
        self.view_mut().select_base_layer(&selection);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::LatLng;
    use crate::render::ImageOverlay;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn image(url: &str) -> Renderable {
        let bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
        ImageOverlay::new(url, bounds).unwrap().into()
    }

    #[test]
    fn test_control_entries() {
        let mut control = HeadlessLayerControl::new();
        let base = image("base.png");
        let overlay = image("overlay.png");

        control.add_base_layer(&base, "L1");
        control.add_overlay(&overlay, "Electrical");

        assert_eq!(control.base_labels(), ["L1"]);
        assert_eq!(control.overlay_labels(), ["Electrical"]);
        assert_eq!(control.base_entry("L1").map(|e| e.id), Some(base.id()));

        control.remove_layer(overlay.id());
        assert!(control.overlay_labels().is_empty());
        assert_eq!(control.entries().len(), 1);

        // Removing an unknown id is a no-op
        control.remove_layer(overlay.id());
        assert_eq!(control.entries().len(), 1);
    }

    #[test]
    fn test_control_attach() {
        let mut view = HeadlessMapView::new();
        let mut control = HeadlessLayerControl::new();
        assert!(!control.is_attached());

        control.add_to(&mut view);
        assert!(control.is_attached());
    }

    #[test]
    fn test_view_layers() {
        let mut view = HeadlessMapView::new();
        let layer = image("a.png");

        view.add_layer(&layer);
        view.add_layer(&layer);
        assert_eq!(view.layers().len(), 1);
        assert!(view.has_layer(layer.id()));

        view.remove_layer(layer.id());
        assert!(view.layers().is_empty());
    }

    #[test]
    fn test_select_base_layer_swaps_shown_base() {
        let mut view = HeadlessMapView::new();
        let mut control = HeadlessLayerControl::new();
        let l1 = image("l1.png");
        let l2 = image("l2.png");
        let overlay = image("overlay.png");
        control.add_base_layer(&l1, "L1");
        control.add_base_layer(&l2, "L2");
        control.add_overlay(&overlay, "Electrical");
        view.add_layer(&l1);
        view.add_layer(&overlay);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let listener_seen = Rc::clone(&seen);
        view.on_base_layer_change(Box::new(move |change: &BaseLayerChange| {
            listener_seen.borrow_mut().push(change.clone());
        }));

        let selection = control.select_base("L2").unwrap();
        assert_eq!(selection.replaced(), [l1.id()]);
        view.select_base_layer(&selection);

        assert!(!view.has_layer(l1.id()));
        assert!(view.has_layer(l2.id()));
        assert!(view.has_layer(overlay.id()));
        assert_eq!(
            *seen.borrow(),
            [BaseLayerChange::new("L2").with_layer(l2.id())]
        );
    }

    #[test]
    fn test_select_unknown_base() {
        let mut control = HeadlessLayerControl::new();
        control.add_overlay(&image("overlay.png"), "Electrical");

        assert!(control.select_base("Electrical").is_none());
        assert!(control.select_base("L1").is_none());
    }

    #[test]
    fn test_view_emits_to_all_listeners() {
        let mut view = HeadlessMapView::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            view.on_base_layer_change(Box::new(move |change: &BaseLayerChange| {
                seen.borrow_mut().push(change.name.clone());
            }));
        }

        view.emit_base_layer_change(&BaseLayerChange::new("L2"));
        assert_eq!(view.listener_count(), 2);
        assert_eq!(*seen.borrow(), ["L2", "L2"]);
    }
}
