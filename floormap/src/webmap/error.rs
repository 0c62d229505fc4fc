//! Composition engine error types.

use thiserror::Error;

use crate::render::RenderError;
use crate::resolver::ResolveError;

/// Result type for composition operations.
pub type WebmapResult<T> = Result<T, WebmapError>;

/// Errors that can occur while composing a map.
#[derive(Debug, Error)]
pub enum WebmapError {
    /// The path resolver rejected a layer.
    #[error("Failed to resolve layer '{layer}' of level '{level}': {source}")]
    Resolve {
        level: String,
        layer: String,
        source: ResolveError,
    },

    /// A renderable could not be constructed from its resolved location.
    #[error("Failed to build layer '{layer}' of level '{level}': {source}")]
    Render {
        level: String,
        layer: String,
        source: RenderError,
    },

    /// The map description has no primary layer.
    #[error("Map '{0}' declares no layers")]
    NoPrimaryLayer(String),

    /// `initialize()` was called on an engine that is already active.
    #[error("Map '{0}' is already initialized")]
    AlreadyInitialized(String),
}
