//! Native artifacts: platform-specific files generated from the canonical
//! model, addressed by a path relative to the platform's build directory.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single platform-native file produced by a forward build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeArtifact {
    /// Path segments relative to the platform build directory.
    pub path: Vec<String>,

    /// Arbitrary JSON payload.
    pub content: Value,
}

impl NativeArtifact {
    pub fn new(path: impl IntoIterator<Item = impl Into<String>>, content: Value) -> Self {
        NativeArtifact {
            path: path.into_iter().map(Into::into).collect(),
            content,
        }
    }

    /// The artifact's path joined into a relative `PathBuf`.
    pub fn relative_path(&self) -> PathBuf {
        self.path.iter().collect()
    }

    /// Check a single path is usable: non-empty, and every segment is a
    /// plain file/directory name.
    pub fn validate_path(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("artifact path is empty".to_string());
        }
        for segment in &self.path {
            if segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains('/')
                || segment.contains('\\')
            {
                return Err(format!(
                    "artifact path segment `{}` is not a plain name",
                    segment
                ));
            }
        }
        Ok(())
    }
}

/// Reject artifact sets with colliding paths.
///
/// Paths must be unique within one build pass; a collision means two
/// exporters (or one buggy exporter) would silently overwrite each other.
pub fn check_collisions(artifacts: &[NativeArtifact]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for artifact in artifacts {
        artifact.validate_path()?;
        let path = artifact.relative_path();
        if !seen.insert(path.clone()) {
            return Err(format!("duplicate artifact path `{}`", path.display()));
        }
    }
    Ok(())
}
