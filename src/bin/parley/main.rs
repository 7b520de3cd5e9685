//! Parley CLI - build, reverse-build, and deploy interaction models

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use parley::util::errors::PipelineError;

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    if let Err(e) = run(cli) {
        std::process::exit(report(e, verbose));
    }
}

/// Map an error to its exit code, printing it on the way out.
///
/// A user cancellation is a clean exit; running outside a project is its
/// own code so wrappers can tell "wrong directory" from a real failure.
/// The full diagnostic rendering is reserved for `--verbose`; the default
/// is a one-line message plus the help text, if any.
fn report(e: anyhow::Error, verbose: bool) -> i32 {
    if let Some(PipelineError::Cancelled) = e.downcast_ref::<PipelineError>() {
        eprintln!("cancelled");
        return 0;
    }
    if e.downcast_ref::<commands::NotInProject>().is_some() {
        eprintln!("error: {e:#}");
        return 2;
    }
    match e.downcast::<PipelineError>() {
        // Pipeline errors carry miette diagnostics (codes, help text).
        Ok(pipeline) if verbose => eprintln!("{:?}", miette::Report::new(pipeline)),
        Ok(pipeline) => {
            eprintln!("error: {pipeline}");
            if let Some(help) = pipeline.help() {
                eprintln!("  help: {help}");
            }
        }
        Err(other) => eprintln!("error: {other:#}"),
    }
    1
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new("parley=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("parley=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::New(args) => commands::new::execute(args),
        Commands::Init(args) => commands::init::execute(args),
        Commands::Build(args) => commands::build::execute(args),
        Commands::Get(args) => commands::get::execute(args),
        Commands::Deploy(args) => commands::deploy::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
