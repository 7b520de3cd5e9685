//! `parley init` command

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::InitArgs;
use parley::ops::{init_project, NewOptions};
use parley::util::prompt::StdinPrompt;

pub fn execute(args: InitArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let name = match args.name {
        Some(name) => name,
        None => path
            .canonicalize()
            .unwrap_or_else(|_| path.clone())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("cannot infer a project name from the target directory")?,
    };

    let opts = NewOptions { name: name.clone(), init: true };
    init_project(&path, &opts, &StdinPrompt)?;

    eprintln!("     Created project `{name}` in {}", path.display());
    Ok(())
}
