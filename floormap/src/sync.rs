//! Overlay synchronization.
//!
//! The layer-selection control must only ever list the overlays of the
//! level that is currently selected. [`OverlaySynchronizer::sync`] enforces
//! this with an unconditional clear followed by a re-register:
//!
//! 1. Remove every overlay of *every* level from the control
//! 2. Register the overlays of the target level under their display labels
//!
//! Clearing everything rather than only the previous level's overlays makes
//! the operation idempotent and leaves no stale entries behind, whatever the
//! control held before.

use std::rc::Rc;

use tracing::{debug, info};

use crate::factory::Overlays;
use crate::view::LayerControl;

/// Keeps control overlay entries equal to the active level's overlays.
#[derive(Debug, Clone)]
pub struct OverlaySynchronizer {
    overlays: Rc<Overlays>,
}

impl OverlaySynchronizer {
    pub fn new(overlays: Rc<Overlays>) -> Self {
        Self { overlays }
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// Re-registers the control's overlay entries for `level`.
    ///
    /// A level without overlays (or an unknown level) leaves the control
    /// with no overlay entries. Returns the number of entries registered.
    pub fn sync<C>(&self, control: &mut C, level: &str) -> usize
    where
        C: LayerControl + ?Sized,
    {
        for entry in self.overlays.entries() {
            control.remove_layer(entry.layer.id());
        }

        let Some(level_overlays) = self.overlays.get(level) else {
            debug!(level = %level, "No overlays for level");
            return 0;
        };

        for entry in level_overlays.iter() {
            control.add_overlay(&entry.layer, &entry.label);
        }

        info!(
            level = %level,
            overlays = level_overlays.len(),
            "Synchronized overlay entries"
        );
        level_overlays.len()
    }
}
