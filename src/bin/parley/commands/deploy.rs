//! `parley deploy` command

use std::rc::Rc;

use anyhow::Result;

use crate::cli::DeployArgs;
use parley::ops::{self, DeployOptions};
use parley::platforms;
use parley::util::prompt::StdinPrompt;

pub fn execute(args: DeployArgs) -> Result<()> {
    let project = super::load_project(args.stage.as_deref())?;
    let targets = ops::default_targets(&project);

    let options = DeployOptions { platforms: args.platform };
    let summary = ops::deploy(
        &project,
        &platforms::builtins(),
        Rc::new(StdinPrompt),
        &targets,
        &options,
    )?;

    for upload in &summary.uploads {
        eprintln!(
            "    Deployed {} ({} artifact(s), revision {})",
            upload.platform, upload.artifacts, upload.revision
        );
    }
    Ok(())
}
