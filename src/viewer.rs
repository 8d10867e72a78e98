//! High-level rendering of a loaded transcript.
//!
//! This is the hand-off point to presentation: callers load a [`TranscriptFile`] (see
//! [`crate::source`]) and ask us to write it, optionally excerpted to a time range, in one of the
//! [`OutputType`] formats. We wire selection → summary → encoder and keep the encoder lifecycle
//! (close even on error) in one place.

use std::fmt;
use std::io::{BufWriter, Write};

use crate::Result;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::model::TranscriptFile;
use crate::opts::Opts;
use crate::output_type::OutputType;
use crate::selection::{Selection, select, total_duration};
use crate::text_encoder::TextEncoder;
use crate::time_codec::{TimeRange, format_duration, format_time_from_ms};
use crate::transcript_encoder::TranscriptEncoder;
use crate::vtt_encoder::VttEncoder;

/// The header shown above a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub language: String,
    pub model: String,
    pub range: Option<TimeRange>,
    pub duration_ms: u64,
    pub segments: String,
}

impl Summary {
    pub fn new(file: &TranscriptFile, selection: &Selection<'_>) -> Self {
        // A full view reports the whole recording, not just what survived filtering.
        let duration_ms = match selection.range() {
            Some(_) => selection.duration_ms(),
            None => total_duration(&file.metadata.transcripts),
        };

        Self {
            language: file.metadata.detected_language_raw.clone(),
            model: file.metadata.model_engine.clone(),
            range: selection.range(),
            duration_ms,
            segments: selection.segments_label(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Model: {}", self.model)?;
        if let Some(range) = self.range {
            writeln!(
                f,
                "Range: {} - {}",
                format_time_from_ms(range.start()),
                format_time_from_ms(range.end())
            )?;
        }
        writeln!(f, "Duration: {}", format_duration(self.duration_ms))?;
        write!(f, "Segments: {}", self.segments)
    }
}

/// Write `file` to `w` according to `opts`.
pub fn write_transcript<W: Write>(file: &TranscriptFile, w: W, opts: &Opts) -> Result<()> {
    let mut writer = BufWriter::new(w);
    let selection = select(&file.metadata.transcripts, opts.time_range);

    tracing::debug!(
        selected = selection.len(),
        total = selection.total(),
        output = ?opts.output_type,
        "rendering transcript"
    );

    // We keep this explicit (no trait objects) so each encoder owns the writer outright.
    match opts.output_type {
        OutputType::Text => {
            if opts.show_header {
                writeln!(writer, "{}\n", Summary::new(file, &selection))?;
            }
            let mut encoder = TextEncoder::new(writer);
            let run_res = write_selection(&selection, &mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
        OutputType::Json => {
            let mut encoder = JsonArrayEncoder::new(writer);
            let run_res = write_selection(&selection, &mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
        OutputType::Vtt => {
            let mut encoder = VttEncoder::new(writer);
            let run_res = write_selection(&selection, &mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
    }
}

fn write_selection<E: TranscriptEncoder>(selection: &Selection<'_>, encoder: &mut E) -> Result<()> {
    for entry in selection.entries() {
        encoder.write_transcript(entry)?;
    }
    Ok(())
}

/// Prefer the run error, but never skip closing the encoder.
fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            tracing::warn!(error = %close_err, "encoder close failed after write error");
            Err(err)
        }
    }
}
