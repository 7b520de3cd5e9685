//! Project configuration: loading, stage resolution, and deep merge.

pub mod merge;
pub mod project;

pub use merge::deep_merge;
pub use project::{find_project_root, resolve, ProjectConfiguration, CONFIG_FILE};
