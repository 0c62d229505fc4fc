//! Single-image path resolution.

use super::{validate_triple, PathResolver, ResolveError};

/// Resolves each layer to one image file, `{root}/{map}/{level}/{layer}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePathResolver {
    root: String,
    extension: String,
}

impl ImagePathResolver {
    pub fn new(root: impl Into<String>, extension: impl Into<String>) -> Self {
        let root: String = root.into();
        let extension: String = extension.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl PathResolver for ImagePathResolver {
    fn resolve(&self, map: &str, level: &str, layer: &str) -> Result<String, ResolveError> {
        validate_triple(map, level, layer)?;
        Ok(format!(
            "{}/{}/{}/{}.{}",
            self.root, map, level, layer, self.extension
        ))
    }

    fn name(&self) -> &str {
        "image"
    }
}
