//! The plugin pipeline: phases, the event bus, contexts, and the plugin
//! registry.

pub mod bus;
pub mod context;
pub mod phase;
pub mod plugin;
pub mod registry;

pub use bus::{EventBus, Handler};
pub use context::{LocaleOutcome, OutcomeStatus, PluginContext, ProjectContext};
pub use phase::{Operation, Phase, Step};
pub use plugin::{Plugin, PluginKind};
pub use registry::PluginRegistry;
