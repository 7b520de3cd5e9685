//! Invocation-scoped context objects.
//!
//! `ProjectContext` carries the resolved configuration and project paths
//! and is passed down explicitly (dependency injection, not a singleton).
//! `PluginContext` is the transient value threaded through every phase of
//! one invocation: earlier phases mutate it, later phases read it — it is
//! the message passed across middleware hops.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::config::project::ProjectConfiguration;
use crate::pipeline::phase::Operation;

/// Resolved project configuration plus the paths derived from it.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Project root (the directory containing parley.json).
    pub root: PathBuf,

    /// Stage-resolved configuration.
    pub config: ProjectConfiguration,
}

impl ProjectContext {
    pub fn new(root: impl Into<PathBuf>, config: ProjectConfiguration) -> Self {
        ProjectContext { root: root.into(), config }
    }

    /// Directory holding canonical model files.
    pub fn models_dir(&self) -> PathBuf {
        self.root.join(&self.config.models.directory)
    }

    /// Root of all platform build output.
    pub fn build_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Build output directory for one platform.
    pub fn platform_build_dir(&self, platform_id: &str) -> PathBuf {
        self.build_dir().join(platform_id)
    }
}

/// Outcome of one platform/locale task.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    /// Forward build succeeded, with the number of artifacts written.
    Built { artifacts: usize },
    /// Reverse build succeeded; the canonical model was written.
    Imported { canonical_locale: String },
    /// Artifacts were staged for upload.
    Staged { artifacts: usize },
    /// The task failed; siblings continued.
    Failed { reason: String },
}

/// Per-locale result recorded by phase handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleOutcome {
    pub platform: String,
    pub locale: String,
    pub status: OutcomeStatus,
}

/// Artifacts a deploy handler staged for the upload step.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    pub platform: String,
    pub artifacts: Vec<crate::model::artifact::NativeArtifact>,
}

/// Transient, per-invocation state threaded through every phase.
#[derive(Debug, Default)]
pub struct PluginContext {
    /// The operation being run.
    pub operation: Option<Operation>,

    /// Requested canonical locales; empty means every model locale.
    pub locales: Vec<String>,

    /// Requested platform ids; empty means every configured platform.
    pub platforms: Vec<String>,

    /// Parsed command flags not covered by the fields above.
    pub flags: BTreeMap<String, Value>,

    /// Per-locale outcomes recorded by handlers.
    pub outcomes: Vec<LocaleOutcome>,

    /// Uploads staged during the deploy main phase.
    pub staged: Vec<StagedUpload>,
}

impl PluginContext {
    pub fn new(operation: Operation) -> Self {
        PluginContext {
            operation: Some(operation),
            ..PluginContext::default()
        }
    }

    /// Whether `platform_id` is targeted by this invocation.
    pub fn targets_platform(&self, platform_id: &str) -> bool {
        self.platforms.is_empty() || self.platforms.iter().any(|p| p == platform_id)
    }

    /// Record a per-locale outcome.
    pub fn record(&mut self, platform: impl Into<String>, locale: impl Into<String>, status: OutcomeStatus) {
        self.outcomes.push(LocaleOutcome {
            platform: platform.into(),
            locale: locale.into(),
            status,
        });
    }

    /// Read a boolean flag, defaulting to false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Number of failed locale tasks.
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Failed { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_platform_list_targets_everything() {
        let ctx = PluginContext::new(Operation::Build);
        assert!(ctx.targets_platform("generic"));
    }

    #[test]
    fn test_explicit_platform_list_filters() {
        let mut ctx = PluginContext::new(Operation::Build);
        ctx.platforms = vec!["alexa".to_string()];
        assert!(ctx.targets_platform("alexa"));
        assert!(!ctx.targets_platform("generic"));
    }

    #[test]
    fn test_failures_counts_failed_outcomes() {
        let mut ctx = PluginContext::new(Operation::Build);
        ctx.record("generic", "en", OutcomeStatus::Built { artifacts: 1 });
        ctx.record(
            "generic",
            "de",
            OutcomeStatus::Failed { reason: "no model".to_string() },
        );
        assert_eq!(ctx.failures(), 1);
    }

    #[test]
    fn test_flags() {
        let mut ctx = PluginContext::new(Operation::ReverseBuild);
        ctx.flags.insert("clean".to_string(), json!(true));
        assert!(ctx.flag("clean"));
        assert!(!ctx.flag("missing"));
    }
}
