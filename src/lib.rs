// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tap-openproject
//!
//! A Singer tap that extracts projects from the OpenProject REST API.
//!
//! ## Features
//!
//! - **Validated Configuration**: Config files or `OPENPROJECT_*` environment variables,
//!   checked before any network call
//! - **Resilient HTTP**: Exponential backoff on timeouts, connection failures, 429 and 5xx
//! - **Safe Credentials**: The API key never appears in logs, errors or debug output
//! - **Singer Output**: `SCHEMA`, `RECORD` and `STATE` messages on stdout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_openproject::config::TapConfig;
//! use tap_openproject::http::HttpClient;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> tap_openproject::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let client = HttpClient::from_tap_config(&config)?;
//!
//!     let projects = client.fetch("projects").await?;
//!     println!("{} projects", projects.len());
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  CLI (--about / --discover / sync)            │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬───────────┐
//! │  Config  │   Auth    │     HTTP      │  Catalog  │  Output   │
//! ├──────────┼───────────┼───────────────┼───────────┼───────────┤
//! │ File     │ Basic     │ Validation    │ Discover  │ SCHEMA    │
//! │ Env vars │ apikey    │ Retry/Backoff │ Selection │ RECORD    │
//! │ Defaults │ Redaction │ Envelope      │ State     │ STATE     │
//! └──────────┴───────────┴───────────────┴───────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// API key authentication
pub mod auth;

/// HTTP client with retry and backoff
pub mod http;

/// Response envelope decoding
pub mod decode;

/// Stream definitions
pub mod stream;

/// Catalog discovery and selection
pub mod catalog;

/// Sync state
pub mod state;

/// Singer message output
pub mod output;

/// Main execution engine
pub mod engine;

/// Configuration validation
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
