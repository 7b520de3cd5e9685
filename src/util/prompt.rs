//! Interactive prompt collaborator.
//!
//! The pipeline only branches on the returned discriminators; rendering
//! and input live behind the trait so orchestrators stay testable.

use std::io::{self, BufRead, Write};

use crate::util::errors::PipelineError;

/// Answer to a plain overwrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    Overwrite,
    Cancel,
}

/// Answer to the reverse-build prompt, where the existing model can be
/// backed up before being overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseBuildChoice {
    Overwrite,
    Backup,
    Cancel,
}

/// User-facing prompt collaborator.
pub trait Prompt {
    fn overwrite(&self, message: &str) -> Result<OverwriteChoice, PipelineError>;

    fn reverse_build(&self) -> Result<ReverseBuildChoice, PipelineError>;
}

/// Stdin-backed prompt used by the binary.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    fn ask(&self, message: &str, options: &str) -> Result<String, PipelineError> {
        eprint!("{message} {options} ");
        io::stderr().flush().ok();

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| PipelineError::io("failed to read prompt answer", "<stdin>", e))?;
        Ok(line.trim().to_lowercase())
    }
}

impl Prompt for StdinPrompt {
    fn overwrite(&self, message: &str) -> Result<OverwriteChoice, PipelineError> {
        let answer = self.ask(message, "[o]verwrite / [c]ancel:")?;
        Ok(match answer.as_str() {
            "o" | "overwrite" | "y" | "yes" => OverwriteChoice::Overwrite,
            _ => OverwriteChoice::Cancel,
        })
    }

    fn reverse_build(&self) -> Result<ReverseBuildChoice, PipelineError> {
        let answer = self.ask(
            "A model already exists for this locale.",
            "[o]verwrite / [b]ackup / [c]ancel:",
        )?;
        Ok(match answer.as_str() {
            "o" | "overwrite" => ReverseBuildChoice::Overwrite,
            "b" | "backup" => ReverseBuildChoice::Backup,
            _ => ReverseBuildChoice::Cancel,
        })
    }
}

/// Prompt that always answers the same way. Used where `--clean` or
/// non-interactive invocations must not block on stdin, and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPrompt {
    pub overwrite: OverwriteChoice,
    pub reverse_build: ReverseBuildChoice,
}

impl FixedPrompt {
    /// Always overwrite, never ask.
    pub fn overwrite_all() -> Self {
        FixedPrompt {
            overwrite: OverwriteChoice::Overwrite,
            reverse_build: ReverseBuildChoice::Overwrite,
        }
    }

    /// Always cancel.
    pub fn cancel_all() -> Self {
        FixedPrompt {
            overwrite: OverwriteChoice::Cancel,
            reverse_build: ReverseBuildChoice::Cancel,
        }
    }
}

impl Prompt for FixedPrompt {
    fn overwrite(&self, _message: &str) -> Result<OverwriteChoice, PipelineError> {
        Ok(self.overwrite)
    }

    fn reverse_build(&self) -> Result<ReverseBuildChoice, PipelineError> {
        Ok(self.reverse_build)
    }
}
