//! CLI argument definitions using clap.
//!
//! This module defines the command-line interface structure for all
//! timelens commands. It uses clap's derive API for declarative argument
//! parsing.
//!
//! ## Commands
//!
//! - `extract`: Run the timestamp extractor over text
//! - `scan`: Run one parse pass over a page fixture
//! - `watch`: Run the live collector against a fixture's event script
//! - `init`: Initialize the timelens configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Watch(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory to start the config file search from (defaults to the
    /// current directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    /// Texts to scan; reads lines from stdin when omitted
    pub text: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Page fixture file (JSON)
    pub fixture: PathBuf,

    /// Playback position in seconds to highlight entries against
    /// (overrides the fixture's media position)
    #[arg(long)]
    pub at: Option<f64>,

    /// Seek to the timeline entry at this index after the scan
    #[arg(long)]
    pub seek: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Page fixture file (JSON) with an event script
    pub fixture: PathBuf,

    /// How long to keep the collector running, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub duration_ms: u64,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract normalized time offsets from comment text
    Extract(ExtractCommand),
    /// Run one parse pass over a page fixture and print the timeline
    Scan(ScanCommand),
    /// Run the live collector session against a fixture's event script
    Watch(WatchCommand),
    /// Initialize a new .timelensrc.json configuration file
    Init,
}
