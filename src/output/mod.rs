//! Output module
//!
//! Singer messages and the line-oriented writer that puts them on stdout.
//! Diagnostics never go through this module; they are logged to stderr.

mod messages;
mod writer;

pub use messages::Message;
pub use writer::MessageWriter;
