use crate::Result;
use crate::model::Transcript;

/// Streams transcript entries to some output.
///
/// Encoders are stateful: callers write entries in display order and then call `close` exactly
/// once they're done. `close` must be idempotent, and writing after `close` is an error.
pub trait TranscriptEncoder {
    fn write_transcript(&mut self, entry: &Transcript) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
