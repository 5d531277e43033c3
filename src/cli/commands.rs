//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Singer tap for the OpenProject REST API
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tap-openproject")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON). Falls back to OPENPROJECT_* environment variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Catalog file (JSON) selecting the streams to sync
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// State file (JSON) from a previous run
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Print the catalog of available streams and exit
    #[arg(short, long, conflicts_with = "about")]
    pub discover: bool,

    /// Print tap capabilities and settings and exit
    #[arg(long)]
    pub about: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// What an invocation asks the tap to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    About,
    Discover,
    Sync,
}

impl Cli {
    /// The mode selected by the flags
    pub fn mode(&self) -> Mode {
        if self.about {
            Mode::About
        } else if self.discover {
            Mode::Discover
        } else {
            Mode::Sync
        }
    }
}
