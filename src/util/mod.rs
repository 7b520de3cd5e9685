//! Shared utilities

pub mod deploy;
pub mod errors;
pub mod fs;
pub mod prompt;

pub use deploy::{DeployTarget, DirDeployTarget};
pub use errors::PipelineError;
pub use fs::{ArtifactStore, DirArtifactStore, DirModelStore, ModelStore};
pub use prompt::{FixedPrompt, Prompt, StdinPrompt};
