//! Implementation of `parley build`.

use std::rc::Rc;

use crate::pipeline::context::{LocaleOutcome, PluginContext, ProjectContext};
use crate::pipeline::phase::Operation;
use crate::transform::Platform;
use crate::util::errors::PipelineError;
use crate::util::prompt::Prompt;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Canonical locales to build (empty = every model locale).
    pub locales: Vec<String>,

    /// Platform ids to build for (empty = every configured platform).
    pub platforms: Vec<String>,
}

/// What a build invocation did, per platform and locale.
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub outcomes: Vec<LocaleOutcome>,
}

impl BuildSummary {
    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, crate::pipeline::context::OutcomeStatus::Failed { .. }))
            .count()
    }
}

/// Run the forward build phase sequence across the configured platforms.
pub fn build(
    project: &ProjectContext,
    available: &[Rc<dyn Platform>],
    prompt: Rc<dyn Prompt>,
    options: &BuildOptions,
) -> Result<BuildSummary, PipelineError> {
    let (bus, _registry) = super::wire(project, available, &prompt)?;

    let mut ctx = PluginContext::new(Operation::Build);
    ctx.locales = options.locales.clone();
    ctx.platforms = options.platforms.clone();

    for phase in Operation::Build.phases() {
        bus.run(phase, &mut ctx)?;
    }

    Ok(BuildSummary { outcomes: ctx.outcomes })
}
