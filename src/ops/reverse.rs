//! Implementation of `parley get` (reverse build).

use std::rc::Rc;

use serde_json::json;

use crate::pipeline::context::{LocaleOutcome, PluginContext, ProjectContext};
use crate::pipeline::phase::Operation;
use crate::transform::Platform;
use crate::util::errors::PipelineError;
use crate::util::prompt::Prompt;

/// Options for the reverse-build command.
#[derive(Debug, Clone, Default)]
pub struct ReverseOptions {
    /// Native locale to import (required when the build output holds more
    /// than one).
    pub locale: Option<String>,

    /// Platform ids to import from (empty = every configured platform).
    pub platforms: Vec<String>,

    /// Overwrite existing canonical models without prompting.
    pub clean: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ReverseSummary {
    pub outcomes: Vec<LocaleOutcome>,
}

/// Run the reverse-build phase sequence across the configured platforms.
pub fn reverse_build(
    project: &ProjectContext,
    available: &[Rc<dyn Platform>],
    prompt: Rc<dyn Prompt>,
    options: &ReverseOptions,
) -> Result<ReverseSummary, PipelineError> {
    let (bus, _registry) = super::wire(project, available, &prompt)?;

    let mut ctx = PluginContext::new(Operation::ReverseBuild);
    ctx.locales = options.locale.iter().cloned().collect();
    ctx.platforms = options.platforms.clone();
    ctx.flags.insert("clean".to_string(), json!(options.clean));

    for phase in Operation::ReverseBuild.phases() {
        bus.run(phase, &mut ctx)?;
    }

    Ok(ReverseSummary { outcomes: ctx.outcomes })
}
