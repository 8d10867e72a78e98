use std::io::Write;

use crate::model::Transcript;
use crate::transcript_encoder::TranscriptEncoder;
use crate::{Error, Result};

/// Where the encoder is in the `[ entry, entry, ... ]` sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    Unopened,
    Open { entries: usize },
    Closed,
}

/// Streams the selected entries as one JSON array.
///
/// Each element has the same camelCase shape as the `transcripts` field of `metadata.json`,
/// so an excerpt can be dropped back into a container unchanged. An excerpt with no entries
/// still closes to `[]`.
pub struct JsonArrayEncoder<W: Write> {
    w: W,
    state: ArrayState,
}

impl<W: Write> JsonArrayEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            state: ArrayState::Unopened,
        }
    }

    /// Number of entries written so far.
    pub fn written(&self) -> usize {
        match self.state {
            ArrayState::Open { entries } => entries,
            ArrayState::Unopened | ArrayState::Closed => 0,
        }
    }
}

impl<W: Write> TranscriptEncoder for JsonArrayEncoder<W> {
    fn write_transcript(&mut self, entry: &Transcript) -> Result<()> {
        let entries = match self.state {
            ArrayState::Closed => {
                return Err(Error::msg(
                    "cannot write transcript: encoder is already closed",
                ));
            }
            ArrayState::Unopened => {
                self.w.write_all(b"[")?;
                0
            }
            ArrayState::Open { entries } => {
                self.w.write_all(b",")?;
                entries
            }
        };

        serde_json::to_writer(&mut self.w, entry)?;
        self.state = ArrayState::Open {
            entries: entries + 1,
        };
        Ok(())
    }

    /// Closing twice is a no-op.
    fn close(&mut self) -> Result<()> {
        match self.state {
            ArrayState::Closed => return Ok(()),
            ArrayState::Unopened => self.w.write_all(b"[]")?,
            ArrayState::Open { .. } => self.w.write_all(b"]")?,
        }
        self.w.flush()?;

        self.state = ArrayState::Closed;
        Ok(())
    }
}
