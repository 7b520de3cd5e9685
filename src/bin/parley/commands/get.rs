//! `parley get` command (reverse build)

use std::rc::Rc;

use anyhow::Result;

use crate::cli::GetArgs;
use parley::ops::{self, ReverseOptions};
use parley::platforms;
use parley::util::prompt::StdinPrompt;

pub fn execute(args: GetArgs) -> Result<()> {
    let project = super::load_project(args.stage.as_deref())?;

    let options = ReverseOptions {
        locale: args.locale,
        platforms: args.platform,
        clean: args.clean,
    };
    let summary = ops::reverse_build(
        &project,
        &platforms::builtins(),
        Rc::new(StdinPrompt),
        &options,
    )?;

    eprint!("{}", ops::format_outcomes(&summary.outcomes));
    Ok(())
}
