//! Tiled-folder path resolution.
//!
//! Tiles for one layer of one level live in their own folder:
//!
//! ```text
//! {root}/{map}/{level}/{layer}/{z}/{x}/{y}.png
//! ```
//!
//! The resolver returns the folder; the layer factory appends [`TILE_SUFFIX`].

use super::{validate_triple, PathResolver, ResolveError};

/// Tile-addressing suffix appended to a resolved folder.
pub const TILE_SUFFIX: &str = "/{z}/{x}/{y}.png";

/// Resolves each layer to a folder of zoom/x/y tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiledPathResolver {
    root: String,
}

impl TiledPathResolver {
    /// Creates a resolver rooted at the given folder or URL prefix.
    pub fn new(root: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }
}

impl PathResolver for TiledPathResolver {
    fn resolve(&self, map: &str, level: &str, layer: &str) -> Result<String, ResolveError> {
        validate_triple(map, level, layer)?;
        Ok(format!("{}/{}/{}/{}", self.root, map, level, layer))
    }

    fn name(&self) -> &str {
        "tiled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_folder() {
        let resolver = TiledPathResolver::new("https://cdn.example.com/maps/");
        assert_eq!(resolver.root(), "https://cdn.example.com/maps");

        let location = resolver.resolve("hq", "L2", "electrical").unwrap();
        assert_eq!(location, "https://cdn.example.com/maps/hq/L2/electrical");
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let resolver = TiledPathResolver::new("maps");
        let first = resolver.resolve("hq", "basement", "floor").unwrap();
        let second = resolver.resolve("hq", "basement", "floor").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_path_navigation() {
        let resolver = TiledPathResolver::new("maps");
        assert!(matches!(
            resolver.resolve("hq", "../secret", "floor").unwrap_err(),
            ResolveError::InvalidIdentifier { kind: "level", .. }
        ));
        assert!(matches!(
            resolver.resolve("", "L1", "floor").unwrap_err(),
            ResolveError::InvalidIdentifier { kind: "map", .. }
        ));
    }
}
