//! Platform plugins.
//!
//! [`PlatformPlugin`] adapts any [`Platform`] implementation into a
//! pipeline [`Plugin`]: it binds the resolved plugin configuration, opts
//! out of invocations that do not target it, and drives the transformation
//! engine during the main phases. Per-locale failures are recorded and do
//! not stop sibling locales.

pub mod generic;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use crate::model::locale;
use crate::pipeline::bus::{EventBus, Handler};
use crate::pipeline::context::{OutcomeStatus, PluginContext, ProjectContext, StagedUpload};
use crate::pipeline::phase::{Operation, Phase};
use crate::pipeline::plugin::{Plugin, PluginKind};
use crate::transform::{self, Platform};
use crate::util::errors::PipelineError;
use crate::util::fs::{ArtifactStore, DirArtifactStore, DirModelStore, ModelStore};
use crate::util::prompt::Prompt;

pub use generic::GenericPlatform;

/// The platform implementations this build knows about.
pub fn builtins() -> Vec<Rc<dyn Platform>> {
    vec![Rc::new(GenericPlatform::new())]
}

/// Adapter from a [`Platform`] to a pipeline [`Plugin`].
pub struct PlatformPlugin {
    platform: Rc<dyn Platform>,
    project: ProjectContext,
    prompt: Rc<dyn Prompt>,
    config: RefCell<Value>,
}

impl PlatformPlugin {
    pub fn new(platform: Rc<dyn Platform>, project: ProjectContext, prompt: Rc<dyn Prompt>) -> Self {
        PlatformPlugin {
            platform,
            project,
            prompt,
            config: RefCell::new(Value::Object(serde_json::Map::new())),
        }
    }

    fn model_store(&self) -> DirModelStore {
        DirModelStore::new(self.project.models_dir())
    }

    fn artifact_store(&self) -> DirArtifactStore {
        DirArtifactStore::new(self.project.platform_build_dir(self.platform.id()))
    }

    fn run_build(&self, ctx: &mut PluginContext) -> Result<(), PipelineError> {
        let models = self.model_store();
        let artifacts = self.artifact_store();

        let locales = if ctx.locales.is_empty() {
            models.list_locales()?
        } else {
            ctx.locales.clone()
        };
        if locales.is_empty() {
            tracing::warn!(platform = %self.platform.id(), "no model locales to build");
            return Ok(());
        }

        // A single-locale platform must see at most one target across the
        // whole invocation, not merely per canonical locale; checked here
        // so nothing is written for any locale.
        if self.platform.single_locale() {
            let supported = self.platform.supported_locales();
            let mut targets: Vec<String> = Vec::new();
            for locale in &locales {
                for target in
                    locale::resolve(locale, &supported, Some(&self.project.config.models.locales))
                {
                    if !targets.contains(&target) {
                        targets.push(target);
                    }
                }
            }
            if targets.len() > 1 {
                return Err(PipelineError::UnsupportedLocale {
                    platform: self.platform.id().to_string(),
                    reason: format!(
                        "the invocation resolves to {} locales ({}) but the platform supports exactly one",
                        targets.len(),
                        targets.join(", ")
                    ),
                });
            }
        }

        let config = self.config.borrow().clone();
        for locale in locales {
            let result = transform::build_locale(
                self.platform.as_ref(),
                &models,
                &artifacts,
                &self.project.config.models.locales,
                self.project.config.models.overrides.get(&locale),
                &config,
                &locale,
            );
            match result {
                Ok(build) => {
                    tracing::debug!(
                        platform = %self.platform.id(),
                        locale = %locale,
                        artifacts = build.artifacts_written,
                        "built"
                    );
                    ctx.record(
                        self.platform.id(),
                        locale,
                        OutcomeStatus::Built { artifacts: build.artifacts_written },
                    );
                }
                // Sibling locales are independent tasks; keep going.
                Err(e) if e.is_locale_scoped() => {
                    tracing::warn!(platform = %self.platform.id(), locale = %locale, error = %e, "locale failed");
                    ctx.record(
                        self.platform.id(),
                        locale,
                        OutcomeStatus::Failed { reason: e.to_string() },
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn run_reverse(&self, ctx: &mut PluginContext) -> Result<(), PipelineError> {
        let models = self.model_store();
        let artifacts = self.artifact_store();

        let outcome = transform::reverse_locale(
            self.platform.as_ref(),
            &models,
            &artifacts,
            &self.project.config.models.locales,
            self.prompt.as_ref(),
            ctx.locales.first().map(String::as_str),
            ctx.flag("clean"),
        )?;

        ctx.record(
            self.platform.id(),
            outcome.native_locale.clone(),
            OutcomeStatus::Imported { canonical_locale: outcome.canonical_locale.clone() },
        );
        Ok(())
    }

    fn run_stage(&self, ctx: &mut PluginContext) -> Result<(), PipelineError> {
        let artifacts = self.artifact_store().read_all()?;
        if artifacts.is_empty() {
            return Err(PipelineError::ArtifactExport {
                platform: self.platform.id().to_string(),
                locale: "*".to_string(),
                reason: "no artifacts in the build directory; run `parley build` first".to_string(),
            });
        }

        ctx.record(
            self.platform.id(),
            "*",
            OutcomeStatus::Staged { artifacts: artifacts.len() },
        );
        ctx.staged.push(StagedUpload {
            platform: self.platform.id().to_string(),
            artifacts,
        });
        Ok(())
    }
}

impl Plugin for PlatformPlugin {
    fn id(&self) -> &str {
        self.platform.id()
    }

    fn kind(&self) -> PluginKind {
        PluginKind::Platform
    }

    fn install(&self, config: &Value) -> Result<(), PipelineError> {
        self.platform.configure(config)?;
        *self.config.borrow_mut() = config.clone();
        Ok(())
    }

    fn middleware(self: Rc<Self>) -> Vec<(Phase, Handler)> {
        let mut handlers: Vec<(Phase, Handler)> = Vec::new();

        // Opt out of invocations that do not target this platform before
        // any main phase runs.
        for operation in [Operation::Build, Operation::ReverseBuild, Operation::Deploy] {
            let me = Rc::clone(&self);
            handlers.push((
                Phase::before(operation),
                Rc::new(move |bus: &EventBus, ctx: &mut PluginContext| {
                    if !ctx.targets_platform(me.platform.id()) {
                        tracing::debug!(platform = %me.platform.id(), "not targeted, opting out");
                        bus.unregister_owner(me.platform.id());
                    }
                    Ok(())
                }),
            ));
        }

        let me = Rc::clone(&self);
        handlers.push((
            Phase::main(Operation::Build),
            Rc::new(move |_: &EventBus, ctx: &mut PluginContext| me.run_build(ctx)),
        ));

        let me = Rc::clone(&self);
        handlers.push((
            Phase::main(Operation::ReverseBuild),
            Rc::new(move |_: &EventBus, ctx: &mut PluginContext| me.run_reverse(ctx)),
        ));

        let me = Rc::clone(&self);
        handlers.push((
            Phase::main(Operation::Deploy),
            Rc::new(move |_: &EventBus, ctx: &mut PluginContext| me.run_stage(ctx)),
        ));

        handlers
    }
}
