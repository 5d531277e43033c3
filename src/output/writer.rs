//! Line-delimited JSON writer

use super::Message;
use crate::error::Result;
use std::io::Write;

/// Writes one JSON-encoded message per line
pub struct MessageWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> MessageWriter<W> {
    /// Wrap an output sink
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Write a single message and flush it
    pub fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Number of messages written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Give back the underlying sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> std::fmt::Debug for MessageWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageWriter")
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
