//! Forward build: canonical model -> native artifact set, per canonical
//! locale.

use serde_json::Value;

use crate::config::merge::deep_merge;
use crate::model::artifact::{check_collisions, NativeArtifact};
use crate::model::canonical::CanonicalModel;
use crate::model::locale::{self, LocaleMap};
use crate::transform::Platform;
use crate::util::errors::PipelineError;
use crate::util::fs::{ArtifactStore, ModelStore};

/// Result of building one canonical locale.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleBuild {
    pub canonical_locale: String,
    pub target_locales: Vec<String>,
    pub artifacts_written: usize,
}

/// Build one canonical locale against one platform.
///
/// Fails fast (before any write) on locale constraints; everything past
/// the export step writes artifacts one by one, merging onto existing
/// content so platform-managed fields survive rebuilds.
pub fn build_locale(
    platform: &dyn Platform,
    models: &dyn ModelStore,
    artifacts: &dyn ArtifactStore,
    locale_map: &LocaleMap,
    project_override: Option<&Value>,
    plugin_config: &Value,
    canonical_locale: &str,
) -> Result<LocaleBuild, PipelineError> {
    let supported = platform.supported_locales();
    let target_locales = locale::resolve(canonical_locale, &supported, Some(locale_map));

    if platform.single_locale() && target_locales.len() > 1 {
        return Err(PipelineError::UnsupportedLocale {
            platform: platform.id().to_string(),
            reason: format!(
                "`{canonical_locale}` resolves to {} locales ({}) but the platform supports exactly one",
                target_locales.len(),
                target_locales.join(", ")
            ),
        });
    }
    if target_locales.is_empty() {
        return Err(PipelineError::UnsupportedLocale {
            platform: platform.id().to_string(),
            reason: format!("`{canonical_locale}` resolves to no platform locale"),
        });
    }
    if !supported.is_empty() {
        for target in &target_locales {
            if !supported.contains(target) {
                return Err(PipelineError::UnsupportedLocale {
                    platform: platform.id().to_string(),
                    reason: format!("locale `{target}` is not in the platform's supported set"),
                });
            }
        }
    }

    let model = overlaid_model(models, project_override, plugin_config, canonical_locale)?;
    model.validate(canonical_locale)?;

    // Export all target locales first so a collision or empty export
    // leaves nothing half-written.
    let mut pending: Vec<NativeArtifact> = Vec::new();
    for target in &target_locales {
        let exported = platform.export(target, &model)?;
        if exported.is_empty() {
            return Err(PipelineError::ArtifactExport {
                platform: platform.id().to_string(),
                locale: target.clone(),
                reason: "exporter produced no artifacts".to_string(),
            });
        }
        pending.extend(exported);
    }

    check_collisions(&pending).map_err(|reason| PipelineError::ArtifactExport {
        platform: platform.id().to_string(),
        locale: canonical_locale.to_string(),
        reason,
    })?;

    let written = pending.len();
    for artifact in pending {
        let reconciled = reconcile(artifacts, plugin_config, artifact)?;
        artifacts.write(&reconciled)?;
    }

    Ok(LocaleBuild {
        canonical_locale: canonical_locale.to_string(),
        target_locales,
        artifacts_written: written,
    })
}

/// Load the canonical model and apply the two optional override layers:
/// the project-wide per-locale override, then the platform plugin's.
fn overlaid_model(
    models: &dyn ModelStore,
    project_override: Option<&Value>,
    plugin_config: &Value,
    locale: &str,
) -> Result<CanonicalModel, PipelineError> {
    let base = models.read_model(locale)?;

    let plugin_override = plugin_config.get("modelOverrides").and_then(|o| o.get(locale));
    if project_override.is_none() && plugin_override.is_none() {
        return Ok(base);
    }

    let mut value = serde_json::to_value(&base)
        .map_err(|e| PipelineError::json("failed to serialize model for overlay", e))?;
    if let Some(overlay) = project_override {
        value = deep_merge(value, overlay.clone());
    }
    if let Some(overlay) = plugin_override {
        value = deep_merge(value, overlay.clone());
    }

    serde_json::from_value(value).map_err(|e| PipelineError::InvalidModel {
        locale: locale.to_string(),
        reason: format!("model is invalid after applying overrides: {e}"),
    })
}

/// Merge freshly exported content onto whatever already exists at the
/// artifact's path, then overlay the platform's explicitly-configured
/// fields as the final, highest-priority layer.
///
/// Existing-as-base keeps platform-managed fields (deployment checksums,
/// remote ids) that only the platform round-trip knows about.
fn reconcile(
    store: &dyn ArtifactStore,
    plugin_config: &Value,
    artifact: NativeArtifact,
) -> Result<NativeArtifact, PipelineError> {
    let mut content = match store.read(&artifact.path)? {
        Some(existing) => deep_merge(existing, artifact.content),
        None => artifact.content,
    };

    let key = artifact.path.join("/");
    if let Some(configured) = plugin_config.get("artifactOverrides").and_then(|o| o.get(&key)) {
        content = deep_merge(content, configured.clone());
    }

    Ok(NativeArtifact { path: artifact.path, content })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::canonical::{Intent, IntentInput, InputType, TypeValue};
    use crate::platforms::generic::GenericPlatform;
    use crate::util::fs::{DirArtifactStore, DirModelStore};
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_model() -> CanonicalModel {
        CanonicalModel {
            invocation: "coffee shop".to_string(),
            intents: vec![Intent {
                name: "OrderIntent".to_string(),
                phrases: vec!["a {size} coffee".to_string()],
                inputs: vec![IntentInput {
                    name: "size".to_string(),
                    input_type: "SizeType".to_string(),
                }],
            }],
            input_types: vec![InputType {
                name: "SizeType".to_string(),
                values: vec![TypeValue {
                    value: "large".to_string(),
                    synonyms: vec![],
                }],
            }],
        }
    }

    struct Fixture {
        _tmp: TempDir,
        models: DirModelStore,
        artifacts: DirArtifactStore,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let models = DirModelStore::new(tmp.path().join("models"));
        let artifacts = DirArtifactStore::new(tmp.path().join("build").join("generic"));
        models.write_model("en", &sample_model()).unwrap();
        Fixture { _tmp: tmp, models, artifacts }
    }

    fn en_map() -> LocaleMap {
        LocaleMap::from([("en".to_string(), vec!["en-US".to_string(), "en-CA".to_string()])])
    }

    #[test]
    fn test_build_writes_one_artifact_per_target_locale() {
        let fx = fixture();
        let platform = GenericPlatform::new();

        let build = build_locale(
            &platform,
            &fx.models,
            &fx.artifacts,
            &en_map(),
            None,
            &json!({}),
            "en",
        )
        .unwrap();

        assert_eq!(build.target_locales, vec!["en-US", "en-CA"]);
        assert_eq!(build.artifacts_written, 2);
        assert!(fx.artifacts.read(&["models".into(), "en-US.json".into()]).unwrap().is_some());
        assert!(fx.artifacts.read(&["models".into(), "en-CA.json".into()]).unwrap().is_some());
    }

    #[test]
    fn test_single_locale_platform_rejects_before_writing() {
        let fx = fixture();
        let platform = GenericPlatform::new();
        platform.configure(&json!({"singleLocale": true})).unwrap();

        let err = build_locale(
            &platform,
            &fx.models,
            &fx.artifacts,
            &en_map(),
            None,
            &json!({}),
            "en",
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::UnsupportedLocale { .. }));
        // Nothing was written.
        assert!(fx.artifacts.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_literal_locale_rejected() {
        let fx = fixture();
        let platform = GenericPlatform::new();
        platform
            .configure(&json!({"supportedLocales": ["de-DE"]}))
            .unwrap();

        let map = LocaleMap::from([("en".to_string(), vec!["en-US".to_string()])]);
        let err = build_locale(&platform, &fx.models, &fx.artifacts, &map, None, &json!({}), "en")
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedLocale { .. }));
    }

    #[test]
    fn test_missing_model_is_locale_scoped() {
        let fx = fixture();
        let platform = GenericPlatform::new();

        let err = build_locale(
            &platform,
            &fx.models,
            &fx.artifacts,
            &LocaleMap::new(),
            None,
            &json!({}),
            "de",
        )
        .unwrap_err();
        assert!(err.is_locale_scoped());
    }

    #[test]
    fn test_overrides_layer_project_then_plugin() {
        let fx = fixture();
        let platform = GenericPlatform::new();

        let project_override = json!({"invocation": "project invocation"});
        let plugin_config = json!({
            "modelOverrides": {"en": {"invocation": "plugin invocation"}}
        });

        build_locale(
            &platform,
            &fx.models,
            &fx.artifacts,
            &LocaleMap::new(),
            Some(&project_override),
            &plugin_config,
            "en",
        )
        .unwrap();

        let content = fx
            .artifacts
            .read(&["models".into(), "en.json".into()])
            .unwrap()
            .unwrap();
        // Plugin-specific override is the later, higher-priority layer.
        assert_eq!(content["interactionModel"]["invocationName"], "plugin invocation");
    }

    #[test]
    fn test_rebuild_preserves_platform_managed_fields() {
        let fx = fixture();
        let platform = GenericPlatform::new();
        let map = LocaleMap::new();

        build_locale(&platform, &fx.models, &fx.artifacts, &map, None, &json!({}), "en").unwrap();

        // Simulate a deploy stamping a checksum into the artifact.
        let path = vec!["models".to_string(), "en.json".to_string()];
        let mut stamped = fx.artifacts.read(&path).unwrap().unwrap();
        stamped["deployment"] = json!({"checksum": "abc123"});
        fx.artifacts
            .write(&NativeArtifact { path: path.clone(), content: stamped })
            .unwrap();

        build_locale(&platform, &fx.models, &fx.artifacts, &map, None, &json!({}), "en").unwrap();

        let rebuilt = fx.artifacts.read(&path).unwrap().unwrap();
        assert_eq!(rebuilt["deployment"]["checksum"], "abc123");
        assert_eq!(rebuilt["interactionModel"]["invocationName"], "coffee shop");
    }

    #[test]
    fn test_configured_artifact_fields_win() {
        let fx = fixture();
        let platform = GenericPlatform::new();
        let plugin_config = json!({
            "artifactOverrides": {
                "models/en.json": {"interactionModel": {"invocationName": "configured"}}
            }
        });

        build_locale(
            &platform,
            &fx.models,
            &fx.artifacts,
            &LocaleMap::new(),
            None,
            &plugin_config,
            "en",
        )
        .unwrap();

        let content = fx
            .artifacts
            .read(&["models".into(), "en.json".into()])
            .unwrap()
            .unwrap();
        assert_eq!(content["interactionModel"]["invocationName"], "configured");
    }
}
