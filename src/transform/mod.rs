//! Bidirectional model transformation.
//!
//! The forward engine turns the canonical model into a platform's native
//! artifact set; the reverse engine reconstructs the canonical model from
//! those artifacts. Platforms implement the [`Platform`] trait; everything
//! else (override layering, reconciliation with existing artifacts, locale
//! handling, failure isolation) is platform-independent and lives here.

pub mod forward;
pub mod reverse;

use serde_json::Value;

use crate::model::artifact::NativeArtifact;
use crate::model::canonical::CanonicalModel;
use crate::util::errors::PipelineError;

pub use forward::{build_locale, LocaleBuild};
pub use reverse::{reverse_locale, ReverseOutcome};

/// A platform's exporter/importer pair.
pub trait Platform {
    /// Platform identity, matched against plugin declarations.
    fn id(&self) -> &str;

    /// Locales the platform accepts. Empty means unrestricted.
    fn supported_locales(&self) -> Vec<String>;

    /// Whether the platform supports exactly one active locale per build.
    fn single_locale(&self) -> bool {
        false
    }

    /// Apply plugin configuration at install time.
    fn configure(&self, config: &Value) -> Result<(), PipelineError> {
        let _ = config;
        Ok(())
    }

    /// Export the canonical model for one target locale into zero or more
    /// native artifacts. Returning zero artifacts fails the locale's task.
    fn export(&self, locale: &str, model: &CanonicalModel) -> Result<Vec<NativeArtifact>, PipelineError>;

    /// Which native locales an artifact set contains.
    fn native_locales(&self, artifacts: &[NativeArtifact]) -> Vec<String>;

    /// Reconstruct the canonical model for one native locale from an
    /// artifact set.
    fn import(&self, locale: &str, artifacts: &[NativeArtifact]) -> Result<CanonicalModel, PipelineError>;
}
