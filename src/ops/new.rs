//! Implementation of `parley new` and `parley init`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::project::CONFIG_FILE;
use crate::util::errors::PipelineError;
use crate::util::prompt::{OverwriteChoice, Prompt};

/// Options for creating a new project.
#[derive(Debug, Clone)]
pub struct NewOptions {
    /// Project name
    pub name: String,

    /// Initialize in existing directory
    pub init: bool,
}

/// Create a new Parley project.
pub fn new_project(path: &Path, opts: &NewOptions, prompt: &dyn Prompt) -> Result<()> {
    if path.exists() && !opts.init {
        bail!(
            "destination `{}` already exists\n\
             \n\
             Use `parley init` to initialize an existing directory.",
            path.display()
        );
    }

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("`{CONFIG_FILE}` already exists in `{}`", path.display());
    }

    // Initializing an existing directory may clobber a starter model the
    // user already has; ask before anything is written.
    let model_path = path.join("models").join("en.json");
    if model_path.exists() {
        match prompt.overwrite("`models/en.json` already exists.")? {
            OverwriteChoice::Overwrite => {}
            OverwriteChoice::Cancel => return Err(PipelineError::Cancelled.into()),
        }
    }

    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }

    let config = r#"{
  "endpoint": "https://example.com/webhook",
  "models": {
    "directory": "models"
  },
  "defaultStage": "dev",
  "stages": {
    "dev": {},
    "prod": {}
  },
  "plugins": [
    {
      "id": "generic"
    }
  ]
}
"#;
    fs::write(&config_path, config)
        .with_context(|| format!("failed to write {CONFIG_FILE}"))?;

    let models_dir = path.join("models");
    fs::create_dir_all(&models_dir).with_context(|| "failed to create models directory")?;

    let model = format!(
        r#"{{
  "invocation": "{name}",
  "intents": [
    {{
      "name": "HelloIntent",
      "phrases": [
        "hello",
        "hi there"
      ]
    }}
  ]
}}
"#,
        name = opts.name
    );
    fs::write(&model_path, model)?;

    let gitignore = r#"# Parley build artifacts
build/
.deploy/

# Editor files
*.swp
*~
.vscode/
.idea/
"#;
    fs::write(path.join(".gitignore"), gitignore)?;

    Ok(())
}

/// Initialize a Parley project in an existing directory.
pub fn init_project(path: &Path, opts: &NewOptions, prompt: &dyn Prompt) -> Result<()> {
    let mut opts = opts.clone();
    opts.init = true;
    new_project(path, &opts, prompt)
}
