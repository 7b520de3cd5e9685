//! High-level operations.
//!
//! This module contains the implementation of Parley commands. Each
//! operation wires the configured platform plugins onto a fresh event bus
//! and runs the operation's phase sequence; everything is sequential and
//! deterministic.

pub mod build;
pub mod deploy;
pub mod new;
pub mod reverse;

use std::fmt::Write as _;
use std::rc::Rc;

use crate::pipeline::bus::EventBus;
use crate::pipeline::context::{LocaleOutcome, OutcomeStatus, ProjectContext};
use crate::pipeline::registry::PluginRegistry;
use crate::platforms::PlatformPlugin;
use crate::transform::Platform;
use crate::util::errors::PipelineError;
use crate::util::prompt::Prompt;

pub use build::{build, BuildOptions, BuildSummary};
pub use deploy::{default_targets, deploy, upload_with_retry, DeployOptions, DeploySummary, Upload};
pub use new::{init_project, new_project, NewOptions};
pub use reverse::{reverse_build, ReverseOptions, ReverseSummary};

/// Install every configured platform plugin on a fresh bus.
///
/// Declarations without a matching platform implementation are skipped
/// with a warning; zero installed plugins is also only a warning, the
/// phase run then simply does nothing.
fn wire(
    project: &ProjectContext,
    available: &[Rc<dyn Platform>],
    prompt: &Rc<dyn Prompt>,
) -> Result<(EventBus, PluginRegistry), PipelineError> {
    let bus = EventBus::new();
    let mut registry = PluginRegistry::new();

    for declaration in project.config.platform_plugins() {
        match available.iter().find(|p| p.id() == declaration.id) {
            Some(platform) => {
                let plugin = PlatformPlugin::new(
                    Rc::clone(platform),
                    project.clone(),
                    Rc::clone(prompt),
                );
                registry.install(&bus, Rc::new(plugin), &declaration.config)?;
            }
            None => {
                tracing::warn!(
                    plugin = %declaration.id,
                    "no platform implementation registered for this id, skipping"
                );
            }
        }
    }

    if registry.is_empty() {
        tracing::warn!("no platform plugins installed");
    }
    Ok((bus, registry))
}

/// Render per-locale outcomes for terminal output.
pub fn format_outcomes(outcomes: &[LocaleOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        let line = match &outcome.status {
            OutcomeStatus::Built { artifacts } => format!(
                "{}/{}: {} artifact(s) written",
                outcome.platform, outcome.locale, artifacts
            ),
            OutcomeStatus::Imported { canonical_locale } => format!(
                "{}/{}: imported into model `{}`",
                outcome.platform, outcome.locale, canonical_locale
            ),
            OutcomeStatus::Staged { artifacts } => {
                format!("{}: {} artifact(s) staged", outcome.platform, artifacts)
            }
            OutcomeStatus::Failed { reason } => {
                format!("{}/{}: failed - {}", outcome.platform, outcome.locale, reason)
            }
        };
        let _ = writeln!(out, "  {line}");
    }
    out
}
