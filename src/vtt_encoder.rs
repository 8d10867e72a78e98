use std::io::Write;

use crate::model::Transcript;
use crate::speaker::UNKNOWN_SPEAKER_ID;
use crate::transcript_encoder::TranscriptEncoder;
use crate::{Error, Result};

/// A `TranscriptEncoder` that writes entries in WebVTT format.
///
/// Design:
/// - We stream output directly to a `Write` implementation.
/// - We write the WebVTT header lazily on the first entry, so closing an encoder that saw no
///   entries writes nothing.
/// - Entry ids become cue identifiers and named speakers become `<v Name>` voice tags, so the
///   output parses back through [`crate::vtt::parse_vtt`] with ids and speakers intact.
pub struct VttEncoder<W: Write> {
    /// The underlying writer we stream VTT into.
    w: W,

    /// Whether we've written the `WEBVTT` header.
    started: bool,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    /// Create a new VTT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            closed: false,
        }
    }

    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            // WebVTT files begin with a mandatory header line followed by a blank line.
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> TranscriptEncoder for VttEncoder<W> {
    /// Write a single cue.
    fn write_transcript(&mut self, entry: &Transcript) -> Result<()> {
        if self.closed {
            return Err(Error::msg(
                "cannot write transcript: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        // Identifiers can't span lines or contain the timing arrow.
        if !entry.id.is_empty() && !entry.id.contains("-->") && !entry.id.contains('\n') {
            writeln!(&mut self.w, "{}", entry.id)?;
        }

        let start = format_timestamp_vtt(entry.start);
        let end = format_timestamp_vtt(entry.end);
        writeln!(&mut self.w, "{start} --> {end}")?;

        // A blank line would end the cue early, so collapse the text onto one line.
        let text = entry.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if entry.speaker.id == UNKNOWN_SPEAKER_ID {
            writeln!(&mut self.w, "{text}")?;
        } else {
            writeln!(&mut self.w, "<v {}>{text}", entry.speaker.name)?;
        }

        // Blank line separates cues.
        writeln!(&mut self.w)?;

        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

/// Format milliseconds as a WebVTT timestamp (`HH:MM:SS.mmm`).
fn format_timestamp_vtt(total_ms: u64) -> String {
    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}
