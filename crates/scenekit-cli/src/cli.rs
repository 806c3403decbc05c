//! Scenekit command-line entrypoint.
//!
//! Runs find, replace and analysis over a single story script on disk.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod config;
mod logging;

use config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "scenekit")]
#[command(about = "Search, rewrite and analyze interactive story scripts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// TOML config file with [analyzer] and [search] tables
    #[arg(long, global = true, env = "SCENEKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every match of a query
    Find(FindArgs),

    /// Replace every match of a query
    Replace(ReplaceArgs),

    /// Report missing scenes, unused variables and structure warnings
    Analyze(AnalyzeArgs),
}

/// Flags shared by find and replace
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SearchFlags {
    /// Treat the query as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Match case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// Match whole words only (ignored with --regex)
    #[arg(long)]
    pub whole_word: bool,
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Story script to search
    pub file: PathBuf,

    /// Text or pattern to find
    pub query: String,

    #[command(flatten)]
    pub flags: SearchFlags,

    /// Print matches as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReplaceArgs {
    /// Story script to rewrite
    pub file: PathBuf,

    /// Text or pattern to find
    pub query: String,

    /// Replacement text (`$1`, `$&` and `$$` expand in regex mode)
    pub replacement: String,

    #[command(flatten)]
    pub flags: SearchFlags,

    /// Write the result back to FILE instead of printing it
    #[arg(long)]
    pub write: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Story script to analyze
    pub file: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {err:#}");
    }

    match run(cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Find(args) => commands::find::run(&args, &config),
        Command::Replace(args) => commands::replace::run(&args, &config),
        Command::Analyze(args) => commands::analyze::run(&args, &config),
    }
}
