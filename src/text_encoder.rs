use std::io::Write;

use crate::model::Transcript;
use crate::time_codec::format_duration;
use crate::transcript_encoder::TranscriptEncoder;
use crate::{Error, Result};

/// A `TranscriptEncoder` that writes one human-readable line per entry:
///
/// ```text
/// [0:01 - 0:04] Alice: Hello there
/// [1:02:10 - 1:02:12] Bob ★: Worth remembering
/// ```
///
/// Favorited entries get a star after the speaker name.
pub struct TextEncoder<W: Write> {
    w: W,
    closed: bool,
}

impl<W: Write> TextEncoder<W> {
    pub fn new(w: W) -> Self {
        Self { w, closed: false }
    }
}

impl<W: Write> TranscriptEncoder for TextEncoder<W> {
    fn write_transcript(&mut self, entry: &Transcript) -> Result<()> {
        if self.closed {
            return Err(Error::msg(
                "cannot write transcript: encoder is already closed",
            ));
        }

        let star = if entry.favorited { " ★" } else { "" };
        writeln!(
            &mut self.w,
            "[{} - {}] {}{star}: {}",
            format_duration(entry.start),
            format_duration(entry.end),
            entry.speaker.name,
            entry.text,
        )?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}
