//! Implementation of `parley deploy`.
//!
//! Plugins stage their build output during the deploy main phase; this
//! orchestrator then pushes each staged set to the matching deploy target
//! with optimistic concurrency, retrying a stale-revision conflict exactly
//! once against a re-fetched revision.

use std::rc::Rc;

use crate::pipeline::context::{LocaleOutcome, PluginContext, ProjectContext};
use crate::pipeline::phase::Operation;
use crate::transform::Platform;
use crate::util::deploy::{DeployTarget, DirDeployTarget};
use crate::util::errors::PipelineError;
use crate::util::prompt::Prompt;

/// Options for the deploy command.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Platform ids to deploy (empty = every configured platform).
    pub platforms: Vec<String>,
}

/// One completed upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub platform: String,
    pub artifacts: usize,
    pub revision: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeploySummary {
    pub outcomes: Vec<LocaleOutcome>,
    pub uploads: Vec<Upload>,
}

/// Directory-backed deploy targets for every configured platform.
///
/// Targets live under `.deploy/<platform>` in the project root. A plugin's
/// `deployDirectory` config key relocates its target.
pub fn default_targets(project: &ProjectContext) -> Vec<Rc<dyn DeployTarget>> {
    project
        .config
        .platform_plugins()
        .map(|declaration| {
            let root = declaration
                .config
                .get("deployDirectory")
                .and_then(serde_json::Value::as_str)
                .map(|dir| project.root.join(dir))
                .unwrap_or_else(|| project.root.join(".deploy").join(&declaration.id));
            Rc::new(DirDeployTarget::new(declaration.id.clone(), root)) as Rc<dyn DeployTarget>
        })
        .collect()
}

/// Run the deploy phase sequence, then upload everything the main phase
/// staged.
///
/// Uploads happen between the main and after phases so after-handlers
/// observe the final outcome.
pub fn deploy(
    project: &ProjectContext,
    available: &[Rc<dyn Platform>],
    prompt: Rc<dyn Prompt>,
    targets: &[Rc<dyn DeployTarget>],
    options: &DeployOptions,
) -> Result<DeploySummary, PipelineError> {
    let (bus, _registry) = super::wire(project, available, &prompt)?;

    let mut ctx = PluginContext::new(Operation::Deploy);
    ctx.platforms = options.platforms.clone();

    let [before, main, after] = Operation::Deploy.phases();
    bus.run(before, &mut ctx)?;
    bus.run(main, &mut ctx)?;

    let mut uploads = Vec::new();
    for staged in std::mem::take(&mut ctx.staged) {
        let Some(target) = targets.iter().find(|t| t.id() == staged.platform) else {
            tracing::warn!(platform = %staged.platform, "no deploy target for platform, skipping upload");
            continue;
        };
        let revision = upload_with_retry(target.as_ref(), &staged.artifacts)?;
        tracing::info!(platform = %staged.platform, revision = %revision, "uploaded");
        uploads.push(Upload {
            platform: staged.platform,
            artifacts: staged.artifacts.len(),
            revision,
        });
    }

    bus.run(after, &mut ctx)?;
    Ok(DeploySummary { outcomes: ctx.outcomes, uploads })
}

/// Upload against the target's current revision; on a stale-revision
/// conflict, re-fetch and retry exactly once. A second conflict
/// propagates.
pub fn upload_with_retry(
    target: &dyn DeployTarget,
    artifacts: &[crate::model::artifact::NativeArtifact],
) -> Result<String, PipelineError> {
    let revision = target.current_revision()?;
    match target.upload(artifacts, &revision) {
        Err(PipelineError::PreconditionConflict { resource, expected, found }) => {
            tracing::warn!(
                target = %resource,
                expected = %expected,
                found = %found,
                "remote revision moved, retrying once"
            );
            let revision = target.current_revision()?;
            target.upload(artifacts, &revision)
        }
        other => other,
    }
}
