//! Parley - a build pipeline for conversational app interaction models
//!
//! This crate provides the core library functionality for Parley: staged
//! project configuration, the plugin event bus, the canonical model and
//! its bidirectional transformation into platform-native artifacts, and
//! the build / reverse-build / deploy orchestrators.

pub mod config;
pub mod model;
pub mod ops;
pub mod pipeline;
pub mod platforms;
pub mod transform;
pub mod util;

pub use config::project::ProjectConfiguration;
pub use model::canonical::CanonicalModel;
pub use pipeline::bus::EventBus;
pub use pipeline::context::{PluginContext, ProjectContext};
pub use pipeline::phase::{Operation, Phase};
pub use pipeline::plugin::Plugin;
pub use pipeline::registry::PluginRegistry;
pub use transform::Platform;
pub use util::errors::PipelineError;
