//! Single-image layers.

use super::{LayerId, Pane, RenderError};
use crate::description::LatLngBounds;

/// One image stretched over a rectangular extent.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay {
    id: LayerId,
    url: String,
    bounds: LatLngBounds,
    pane: Pane,
}

impl ImageOverlay {
    pub fn new(url: impl Into<String>, bounds: LatLngBounds) -> Result<Self, RenderError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(RenderError::EmptyLocation);
        }
        if !bounds.is_valid() {
            return Err(RenderError::InvalidBounds(bounds));
        }

        Ok(Self {
            id: LayerId::next(),
            url,
            bounds,
            pane: Pane::Default,
        })
    }

    /// Move the overlay to another pane.
    pub fn in_pane(mut self, pane: Pane) -> Self {
        self.pane = pane;
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bounds(&self) -> LatLngBounds {
        self.bounds
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }
}
