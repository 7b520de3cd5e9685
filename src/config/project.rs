//! Project configuration (`parley.json`) and staged resolution.
//!
//! A project declares a base configuration plus optional named stages
//! (`dev`, `prod`, ...), each a partial configuration merged onto the base
//! with the array-concatenation policy from [`crate::config::merge`].
//! Resolution is one-shot: the returned configuration has no `stages` key,
//! and exactly one plugin instance survives per identity.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::merge::deep_merge;
use crate::model::locale::{self, LocaleMap};
use crate::pipeline::plugin::PluginKind;
use crate::util::errors::PipelineError;

/// Project configuration file name.
pub const CONFIG_FILE: &str = "parley.json";

/// Stage override environment variables, checked in order after the
/// explicit flag and before `defaultStage`.
pub const STAGE_ENV_VARS: [&str; 2] = ["PARLEY_STAGE", "PARLEY_ENV"];

/// Root project configuration, after stage resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfiguration {
    /// Webhook endpoint the built artifacts point at.
    pub endpoint: Option<String>,

    /// Canonical model settings.
    pub models: ModelsConfig,

    /// Stage used when neither flag nor environment selects one.
    pub default_stage: Option<String>,

    /// Ordered plugin declarations, at most one per identity.
    pub plugins: Vec<PluginDeclaration>,
}

/// Canonical model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelsConfig {
    /// Directory holding per-locale model files, relative to the project
    /// root.
    pub directory: PathBuf,

    /// Locale map: canonical locale -> resolution entries.
    pub locales: LocaleMap,

    /// Project-wide per-locale model overrides, applied before any
    /// platform-specific override.
    pub overrides: BTreeMap<String, Value>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        ModelsConfig {
            directory: PathBuf::from("models"),
            locales: LocaleMap::new(),
            overrides: BTreeMap::new(),
        }
    }
}

/// One plugin instance in the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginDeclaration {
    /// Explicit, caller-assigned identity.
    pub id: String,

    /// Declared capability.
    pub kind: PluginKind,

    /// Opaque configuration blob owned by the plugin.
    pub config: Value,
}

impl Default for PluginDeclaration {
    fn default() -> Self {
        PluginDeclaration {
            id: String::new(),
            kind: PluginKind::Platform,
            config: Value::Object(serde_json::Map::new()),
        }
    }
}

impl ProjectConfiguration {
    /// Plugin declaration by identity.
    pub fn plugin(&self, id: &str) -> Option<&PluginDeclaration> {
        self.plugins.iter().find(|p| p.id == id)
    }

    /// Platform plugin declarations, in declaration order.
    pub fn platform_plugins(&self) -> impl Iterator<Item = &PluginDeclaration> {
        self.plugins.iter().filter(|p| p.kind == PluginKind::Platform)
    }
}

/// Search upward from `start` for a directory containing `parley.json`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and stage-resolve the project configuration at `path`.
///
/// Stage selection order: the explicit flag, then `PARLEY_STAGE`, then
/// `PARLEY_ENV`, then the base configuration's `defaultStage`. A selected
/// stage that does not exist degrades to a warning and the base
/// configuration.
pub fn resolve(path: &Path, explicit_stage: Option<&str>) -> Result<ProjectConfiguration, PipelineError> {
    let contents = std::fs::read_to_string(path).map_err(|e| PipelineError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let base: Value = serde_json::from_str(&contents).map_err(|e| PipelineError::ConfigLoad {
        path: path.to_path_buf(),
        reason: format!("invalid JSON: {e}"),
    })?;

    let stage = select_stage(explicit_stage, &base);
    let resolved = resolve_value(base, stage.as_deref()).map_err(|reason| {
        PipelineError::ConfigLoad { path: path.to_path_buf(), reason }
    })?;

    let config: ProjectConfiguration =
        serde_json::from_value(resolved).map_err(|e| PipelineError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if let Some((locale_a, locale_b, entry)) = locale::find_overlap(&config.models.locales) {
        return Err(PipelineError::ConfigLoad {
            path: path.to_path_buf(),
            reason: format!(
                "locale map entry `{entry}` of `{locale_a}` overlaps with `{locale_b}`; \
                 every native locale must have exactly one canonical owner"
            ),
        });
    }

    if config.plugins.is_empty() {
        tracing::warn!("no plugins declared in {}", path.display());
    }

    Ok(config)
}

/// Pick the active stage: flag, then environment, then `defaultStage`.
fn select_stage(explicit: Option<&str>, base: &Value) -> Option<String> {
    stage_from(
        explicit,
        STAGE_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.is_empty()),
        base.get("defaultStage").and_then(Value::as_str).map(str::to_string),
    )
}

fn stage_from(explicit: Option<&str>, env: Option<String>, default: Option<String>) -> Option<String> {
    explicit
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .or(env)
        .or(default)
}

/// Stage-merge and plugin-collapse at the JSON value level.
///
/// Exposed for tests; `resolve` is the filesystem-facing entry point.
pub fn resolve_value(mut base: Value, stage: Option<&str>) -> Result<Value, String> {
    if !base.is_object() {
        return Err("configuration root must be a JSON object".to_string());
    }

    if let Some(stage) = stage {
        let overlay = base
            .get("stages")
            .and_then(|stages| stages.get(stage))
            .cloned();
        match overlay {
            Some(overlay) => {
                tracing::debug!(stage, "applying stage overlay");
                base = deep_merge(base, overlay);
            }
            None => {
                // A missing stage is not an error.
                tracing::warn!(stage, "stage not found in configuration, using base");
            }
        }
    }

    collapse_plugins(&mut base)?;

    if let Some(object) = base.as_object_mut() {
        object.remove("stages");
    }

    Ok(base)
}

/// Collapse the plugin list to one instance per identity.
///
/// Groups preserve first-appearance order; within a group, declarations
/// merge in declaration order, so a stage-origin instance (appended by the
/// array-concatenation merge) wins on scalar conflicts.
fn collapse_plugins(config: &mut Value) -> Result<(), String> {
    let Some(plugins) = config.get_mut("plugins").and_then(Value::as_array_mut) else {
        return Ok(());
    };

    let mut collapsed: Vec<(String, Value)> = Vec::new();
    for declaration in plugins.drain(..) {
        let id = declaration
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "plugin declaration is missing an `id`".to_string())?
            .to_string();

        match collapsed.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => {
                let merged = deep_merge(existing.take(), declaration);
                *existing = merged;
            }
            None => collapsed.push((id, declaration)),
        }
    }

    *plugins = collapsed.into_iter().map(|(_, declaration)| declaration).collect();
    Ok(())
}
