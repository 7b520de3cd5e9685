//! The plugin seam.
//!
//! A plugin declares an explicit identity, a capability kind, a synchronous
//! setup hook that receives its resolved configuration blob, and an ordered
//! phase -> handler map. Identity is a caller-assigned string, never a type
//! name, so unrelated plugins cannot collide across module boundaries.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::bus::Handler;
use crate::pipeline::phase::Phase;
use crate::util::errors::PipelineError;

/// What a plugin contributes to the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    /// Transforms the canonical model to/from a platform's artifacts.
    #[default]
    Platform,
    /// Deployable target (hosting endpoint, model service).
    Target,
    /// Contributes an extra CLI command.
    Command,
}

/// A pipeline plugin.
pub trait Plugin {
    /// Caller-assigned identity; unique within one resolved configuration.
    fn id(&self) -> &str;

    /// Declared capability kind.
    fn kind(&self) -> PluginKind;

    /// Synchronous setup hook, called once at install time with the
    /// plugin's resolved configuration blob.
    fn install(&self, config: &Value) -> Result<(), PipelineError> {
        let _ = config;
        Ok(())
    }

    /// Phase -> handler declarations, in the order they should be
    /// registered on the bus.
    fn middleware(self: Rc<Self>) -> Vec<(Phase, Handler)>;
}
