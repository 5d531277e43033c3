//! CLI runner - executes commands

use crate::catalog::{resolve_selection, Catalog};
use crate::cli::commands::{Cli, Mode};
use crate::config::{settings, TapConfig};
use crate::engine::SyncEngine;
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::MessageWriter;
use crate::state::State;
use crate::stream::ProjectsStream;
use crate::types::JsonValue;
use serde_json::json;
use std::io::Write;
use tracing::{debug, info};

/// Capabilities advertised by `--about`
pub const CAPABILITIES: &[&str] = &["catalog", "discover", "state"];

/// CLI runner
#[derive(Debug)]
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected mode, writing to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        self.run_to(stdout.lock()).await
    }

    /// Run the selected mode, writing to `out`
    pub async fn run_to<W: Write>(&self, mut out: W) -> Result<()> {
        match self.cli.mode() {
            Mode::About => self.about(&mut out),
            Mode::Discover => self.discover(&mut out),
            Mode::Sync => self.sync(out).await,
        }
    }

    /// Load configuration from `--config`, or from the environment
    fn load_config(&self) -> Result<TapConfig> {
        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => {
                debug!("No config file given, reading environment");
                TapConfig::from_env()
            }
        }
    }

    /// Load state from `--state`
    fn load_state(&self) -> Result<State> {
        match &self.cli.state {
            Some(path) => State::from_file(path),
            None => Ok(State::new()),
        }
    }

    /// Load catalog from `--catalog`
    fn load_catalog(&self) -> Result<Option<Catalog>> {
        self.cli.catalog.as_ref().map(Catalog::from_file).transpose()
    }

    /// Describe the tap
    fn about<W: Write>(&self, out: &mut W) -> Result<()> {
        let about = json!({
            "name": crate::NAME,
            "version": crate::VERSION,
            "description": "Singer tap for the OpenProject REST API",
            "capabilities": CAPABILITIES,
            "settings": settings(),
        });
        write_pretty(out, &about)
    }

    /// Print the catalog
    fn discover<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = Catalog::discover()?;
        info!(streams = catalog.streams.len(), "Discovered streams");
        write_pretty(out, &serde_json::to_value(&catalog)?)
    }

    /// Sync selected streams
    async fn sync<W: Write>(&self, out: W) -> Result<()> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let state = self.load_state()?;
        debug!(last_sync = ?state.last_sync(), "Loaded state");
        let selected = resolve_selection(catalog.as_ref());

        let client = HttpClient::from_tap_config(&config)?;
        let mut writer = MessageWriter::new(out);
        let mut engine = SyncEngine::new(&client, ProjectsStream::from_config(&config));
        let result = engine.run(&selected, &state, &mut writer).await;
        client.close();

        let stats = result?;
        info!(
            records = stats.records_synced,
            streams = stats.streams_synced,
            duration_ms = stats.duration_ms,
            "Tap completed successfully"
        );
        Ok(())
    }
}

fn write_pretty<W: Write>(out: &mut W, value: &JsonValue) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
