//! Deploy-target collaborator.
//!
//! The actual cloud clients live outside the core; the orchestrator only
//! needs a revision check and an upload. `DirDeployTarget` is a local
//! directory "remote" with optimistic concurrency over a revision file —
//! enough for offline use and for exercising the conflict-retry path.

use std::path::{Path, PathBuf};

use crate::model::artifact::NativeArtifact;
use crate::util::errors::PipelineError;

/// A remote location previously-built artifacts are uploaded to.
pub trait DeployTarget {
    /// Identity, matched against platform ids at deploy time.
    fn id(&self) -> &str;

    /// Current remote revision.
    fn current_revision(&self) -> Result<String, PipelineError>;

    /// Upload an artifact set against an expected remote revision.
    ///
    /// Fails with `PreconditionConflict` when the remote moved past
    /// `expected_revision` since it was read.
    fn upload(
        &self,
        artifacts: &[NativeArtifact],
        expected_revision: &str,
    ) -> Result<String, PipelineError>;
}

const REVISION_FILE: &str = ".revision";

/// Directory-backed deploy target.
#[derive(Debug, Clone)]
pub struct DirDeployTarget {
    id: String,
    root: PathBuf,
}

impl DirDeployTarget {
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        DirDeployTarget { id: id.into(), root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_revision(&self) -> Result<String, PipelineError> {
        let path = self.root.join(REVISION_FILE);
        if !path.is_file() {
            return Ok("0".to_string());
        }
        std::fs::read_to_string(&path)
            .map(|s| s.trim().to_string())
            .map_err(|e| PipelineError::io("failed to read remote revision", &path, e))
    }

    fn write_revision(&self, revision: &str) -> Result<(), PipelineError> {
        let path = self.root.join(REVISION_FILE);
        std::fs::write(&path, revision)
            .map_err(|e| PipelineError::io("failed to write remote revision", &path, e))
    }
}

impl DeployTarget for DirDeployTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn current_revision(&self) -> Result<String, PipelineError> {
        self.read_revision()
    }

    fn upload(
        &self,
        artifacts: &[NativeArtifact],
        expected_revision: &str,
    ) -> Result<String, PipelineError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| PipelineError::io("failed to create deploy directory", &self.root, e))?;

        let current = self.read_revision()?;
        if current != expected_revision {
            return Err(PipelineError::PreconditionConflict {
                resource: self.id.clone(),
                expected: expected_revision.to_string(),
                found: current,
            });
        }

        for artifact in artifacts {
            let mut path = self.root.clone();
            path.extend(&artifact.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PipelineError::io("failed to create deploy directory", parent, e))?;
            }
            let contents = serde_json::to_string_pretty(&artifact.content)
                .map_err(|e| PipelineError::json("failed to serialize artifact", e))?;
            std::fs::write(&path, contents)
                .map_err(|e| PipelineError::io("failed to upload artifact", &path, e))?;
        }

        let next = current
            .parse::<u64>()
            .map(|n| (n + 1).to_string())
            .unwrap_or_else(|_| "1".to_string());
        self.write_revision(&next)?;
        Ok(next)
    }
}
