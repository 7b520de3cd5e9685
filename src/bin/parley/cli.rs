//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Parley - a build pipeline for conversational app interaction models
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new Parley project
    New(NewArgs),

    /// Initialize a Parley project in an existing directory
    Init(InitArgs),

    /// Build platform artifacts from the canonical models
    Build(BuildArgs),

    /// Rebuild a canonical model from platform build output
    Get(GetArgs),

    /// Upload built artifacts to the configured deploy targets
    Deploy(DeployArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Directory to create the project in (defaults to name)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Canonical locales to build (defaults to every model locale)
    #[arg(short, long)]
    pub locale: Vec<String>,

    /// Platforms to build for (defaults to every configured platform)
    #[arg(short, long)]
    pub platform: Vec<String>,

    /// Configuration stage to resolve
    #[arg(long, env = "PARLEY_STAGE")]
    pub stage: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    /// Native locale to import (required when the build output holds
    /// more than one)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Platform to import from (defaults to every configured platform)
    #[arg(short, long)]
    pub platform: Vec<String>,

    /// Overwrite existing canonical models without prompting
    #[arg(long)]
    pub clean: bool,

    /// Configuration stage to resolve
    #[arg(long, env = "PARLEY_STAGE")]
    pub stage: Option<String>,
}

#[derive(Args)]
pub struct DeployArgs {
    /// Platforms to deploy (defaults to every configured platform)
    #[arg(short, long)]
    pub platform: Vec<String>,

    /// Configuration stage to resolve
    #[arg(long, env = "PARLEY_STAGE")]
    pub stage: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
