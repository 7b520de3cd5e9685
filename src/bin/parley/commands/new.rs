//! `parley new` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::NewArgs;
use parley::ops::{new_project, NewOptions};
use parley::util::prompt::StdinPrompt;

pub fn execute(args: NewArgs) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from(&args.name));

    let opts = NewOptions { name: args.name.clone(), init: false };
    new_project(&path, &opts, &StdinPrompt)?;

    eprintln!("     Created project `{}`", args.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse_new_args(args: &[&str]) -> NewArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            new: NewArgs,
        }
        TestCli::parse_from(args).new
    }

    #[test]
    fn test_new_args_with_name_only() {
        let args = parse_new_args(&["test", "myapp"]);
        assert_eq!(args.name, "myapp");
        assert!(args.path.is_none());
    }

    #[test]
    fn test_new_with_custom_path() {
        let args = parse_new_args(&["test", "myapp", "--path", "custom/location"]);
        assert_eq!(args.path, Some(PathBuf::from("custom/location")));
    }
}
