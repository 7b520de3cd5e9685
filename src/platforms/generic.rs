//! The built-in generic platform.
//!
//! Exports one `models/<locale>.json` artifact per target locale in a
//! plain interaction-model shape. Useful on its own for webhook-only
//! deployments, and the reference exporter/importer for tests.

use std::cell::{Cell, RefCell};

use serde_json::{json, Value};

use crate::model::artifact::NativeArtifact;
use crate::model::canonical::{CanonicalModel, Intent, IntentInput, InputType, TypeValue};
use crate::transform::Platform;
use crate::util::errors::PipelineError;

/// Generic JSON platform.
///
/// Unrestricted locales by default; `supportedLocales` and `singleLocale`
/// in the plugin config narrow it.
#[derive(Debug, Default)]
pub struct GenericPlatform {
    supported: RefCell<Vec<String>>,
    single: Cell<bool>,
}

impl GenericPlatform {
    pub const ID: &'static str = "generic";

    pub fn new() -> Self {
        GenericPlatform::default()
    }

    fn artifact_path(locale: &str) -> Vec<String> {
        vec!["models".to_string(), format!("{locale}.json")]
    }

    fn locale_of(artifact: &NativeArtifact) -> Option<String> {
        match artifact.path.as_slice() {
            [dir, file] if dir == "models" => file.strip_suffix(".json").map(str::to_string),
            _ => None,
        }
    }
}

impl Platform for GenericPlatform {
    fn id(&self) -> &str {
        GenericPlatform::ID
    }

    fn supported_locales(&self) -> Vec<String> {
        self.supported.borrow().clone()
    }

    fn single_locale(&self) -> bool {
        self.single.get()
    }

    fn configure(&self, config: &Value) -> Result<(), PipelineError> {
        if let Some(locales) = config.get("supportedLocales").and_then(Value::as_array) {
            *self.supported.borrow_mut() = locales
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }
        if let Some(single) = config.get("singleLocale").and_then(Value::as_bool) {
            self.single.set(single);
        }
        Ok(())
    }

    fn export(&self, locale: &str, model: &CanonicalModel) -> Result<Vec<NativeArtifact>, PipelineError> {
        let intents: Vec<Value> = model
            .intents
            .iter()
            .map(|intent| {
                json!({
                    "name": intent.name,
                    "samples": intent.phrases,
                    "slots": intent.inputs.iter().map(|input| {
                        json!({"name": input.name, "type": input.input_type})
                    }).collect::<Vec<_>>(),
                })
            })
            .collect();

        let types: Vec<Value> = model
            .input_types
            .iter()
            .map(|input_type| {
                json!({
                    "name": input_type.name,
                    "values": input_type.values.iter().map(|v| {
                        json!({"value": v.value, "synonyms": v.synonyms})
                    }).collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(vec![NativeArtifact::new(
            Self::artifact_path(locale),
            json!({
                "interactionModel": {
                    "invocationName": model.invocation,
                    "intents": intents,
                    "types": types,
                }
            }),
        )])
    }

    fn native_locales(&self, artifacts: &[NativeArtifact]) -> Vec<String> {
        artifacts.iter().filter_map(Self::locale_of).collect()
    }

    fn import(&self, locale: &str, artifacts: &[NativeArtifact]) -> Result<CanonicalModel, PipelineError> {
        let wanted = Self::artifact_path(locale);
        let artifact = artifacts
            .iter()
            .find(|a| a.path == wanted)
            .ok_or_else(|| PipelineError::ArtifactExport {
                platform: self.id().to_string(),
                locale: locale.to_string(),
                reason: "native locale file disappeared during import".to_string(),
            })?;

        let interaction = artifact
            .content
            .get("interactionModel")
            .ok_or_else(|| malformed(locale, "missing `interactionModel`"))?;

        let invocation = interaction
            .get("invocationName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let intents = interaction
            .get("intents")
            .and_then(Value::as_array)
            .map(|list| list.iter().map(|i| import_intent(locale, i)).collect())
            .transpose()?
            .unwrap_or_default();

        let input_types = interaction
            .get("types")
            .and_then(Value::as_array)
            .map(|list| list.iter().map(|t| import_type(locale, t)).collect())
            .transpose()?
            .unwrap_or_default();

        Ok(CanonicalModel { invocation, intents, input_types })
    }
}

fn malformed(locale: &str, reason: &str) -> PipelineError {
    PipelineError::ArtifactExport {
        platform: GenericPlatform::ID.to_string(),
        locale: locale.to_string(),
        reason: format!("malformed native artifact: {reason}"),
    }
}

fn import_intent(locale: &str, value: &Value) -> Result<Intent, PipelineError> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(locale, "intent without a name"))?
        .to_string();

    let phrases = string_list(value.get("samples"));
    let inputs = value
        .get("slots")
        .and_then(Value::as_array)
        .map(|slots| {
            slots
                .iter()
                .map(|slot| {
                    Ok(IntentInput {
                        name: slot
                            .get("name")
                            .and_then(Value::as_str)
                            .ok_or_else(|| malformed(locale, "slot without a name"))?
                            .to_string(),
                        input_type: slot
                            .get("type")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                })
                .collect::<Result<Vec<_>, PipelineError>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(Intent { name, phrases, inputs })
}

fn import_type(locale: &str, value: &Value) -> Result<InputType, PipelineError> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(locale, "type without a name"))?
        .to_string();

    let values = value
        .get("values")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .map(|v| TypeValue {
                    value: v
                        .get("value")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    synonyms: string_list(v.get("synonyms")),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(InputType { name, values })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
