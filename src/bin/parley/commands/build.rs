//! `parley build` command

use std::rc::Rc;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::BuildArgs;
use parley::ops::{self, BuildOptions};
use parley::platforms;
use parley::util::prompt::StdinPrompt;

pub fn execute(args: BuildArgs) -> Result<()> {
    let project = super::load_project(args.stage.as_deref())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("building platform artifacts");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let options = BuildOptions {
        locales: args.locale,
        platforms: args.platform,
    };
    let result = ops::build(
        &project,
        &platforms::builtins(),
        Rc::new(StdinPrompt),
        &options,
    );
    spinner.finish_and_clear();
    let summary = result?;

    eprint!("{}", ops::format_outcomes(&summary.outcomes));

    let failures = summary.failures();
    if failures > 0 {
        bail!("{failures} locale(s) failed to build");
    }
    Ok(())
}
