//! Command implementations

pub mod build;
pub mod completions;
pub mod deploy;
pub mod get;
pub mod init;
pub mod new;

use std::fmt;

use anyhow::Result;

use parley::config;
use parley::pipeline::context::ProjectContext;

/// The current directory is not inside a Parley project.
///
/// Carried as a distinct error type so `main` can map it to its own exit
/// code.
#[derive(Debug)]
pub struct NotInProject;

impl fmt::Display for NotInProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not find `{}` in the current directory or any parent\n\
             \n\
             Use `parley new <name>` to create a project.",
            config::CONFIG_FILE
        )
    }
}

impl std::error::Error for NotInProject {}

/// Locate the project root upward from the current directory and resolve
/// its configuration for the requested stage.
pub fn load_project(stage: Option<&str>) -> Result<ProjectContext> {
    let cwd = std::env::current_dir()?;
    let root = config::find_project_root(&cwd).ok_or(NotInProject)?;
    let resolved = config::resolve(&root.join(config::CONFIG_FILE), stage)?;
    Ok(ProjectContext::new(root, resolved))
}
