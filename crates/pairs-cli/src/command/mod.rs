use std::{fs::File, path::Path};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod session_config;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    verbose: Verbosity,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Play rounds with a perfect-memory player and report the scores
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => {
            // Records are dropped unless a log file is given
            if let Some(path) = arg.log_file() {
                init_logger(&args.verbose, Some(path))?;
            }
            play::run(&arg)?;
        }
        Mode::Simulate(arg) => {
            init_logger(&args.verbose, None)?;
            simulate::run(&arg)?;
        }
    }
    Ok(())
}

/// Installs the logger.
///
/// With `log_file`, records go to that file. Without it, records go to
/// stderr, which the terminal UI must not share.
fn init_logger(verbose: &Verbosity, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbose.log_level_filter());
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.parse_default_env();
    builder
        .try_init()
        .context("Failed to initialize logger")?;
    Ok(())
}
