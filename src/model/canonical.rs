//! The canonical model: the platform-agnostic description of one locale's
//! conversational interface.
//!
//! One JSON file per locale under the project's models directory. The
//! model is always re-read from disk per invocation so on-disk edits are
//! picked up; it is never cached.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::util::errors::PipelineError;

/// Matches `{input}` placeholders inside sample phrases.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*([A-Za-z_][A-Za-z0-9_-]*)\s*\}").expect("valid regex"));

/// Per-locale canonical model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanonicalModel {
    /// Invocation phrase that opens the app.
    pub invocation: String,

    /// Ordered intents.
    pub intents: Vec<Intent>,

    /// Ordered input types referenced by intent inputs.
    pub input_types: Vec<InputType>,
}

/// A single intent: name, sample phrases, and typed inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Intent {
    pub name: String,

    /// Sample phrases; may reference inputs as `{name}`.
    pub phrases: Vec<String>,

    pub inputs: Vec<IntentInput>,
}

/// A typed input an intent's phrases may reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentInput {
    pub name: String,

    /// Name of an input type, either built in to a platform or declared in
    /// the model's `inputTypes`.
    #[serde(rename = "type")]
    pub input_type: String,
}

/// An enumerated input type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputType {
    pub name: String,
    pub values: Vec<TypeValue>,
}

/// One value of an input type, with optional synonyms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeValue {
    pub value: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

impl CanonicalModel {
    /// Validate structural invariants for this locale's model.
    ///
    /// Intent names must be unique, and every `{input}` placeholder used in
    /// a sample phrase must correspond to a declared input on that intent.
    pub fn validate(&self, locale: &str) -> Result<(), PipelineError> {
        let mut seen = HashSet::new();
        for intent in &self.intents {
            if !seen.insert(intent.name.as_str()) {
                return Err(PipelineError::InvalidModel {
                    locale: locale.to_string(),
                    reason: format!("duplicate intent name `{}`", intent.name),
                });
            }

            let declared: HashSet<&str> = intent.inputs.iter().map(|i| i.name.as_str()).collect();
            for phrase in &intent.phrases {
                for capture in PLACEHOLDER.captures_iter(phrase) {
                    let referenced = capture.get(1).map_or("", |m| m.as_str());
                    if !declared.contains(referenced) {
                        return Err(PipelineError::InvalidModel {
                            locale: locale.to_string(),
                            reason: format!(
                                "intent `{}` references undeclared input `{{{}}}` in \"{}\"",
                                intent.name, referenced, phrase
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a declared input type by name.
    pub fn input_type(&self, name: &str) -> Option<&InputType> {
        self.input_types.iter().find(|t| t.name == name)
    }
}
