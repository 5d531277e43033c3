//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Modes
//!
//! - `--about` - Describe the tap and its settings
//! - `--discover` - Print the catalog
//! - default - Sync the selected streams to stdout

mod commands;
mod runner;

pub use commands::{Cli, Mode};
pub use runner::Runner;
