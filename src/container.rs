//! The `.whisper` container: a ZIP archive holding the original audio and its metadata.
//!
//! Layout:
//! - `originalAudio`: raw audio bytes, stored as-is
//! - `metadata.json`: UTF-8 JSON matching [`TranscriptMetadata`]
//!
//! No other members are defined. Unknown extra members are ignored on read.

use std::io::{Cursor, Read, Write};

use zip::ZipArchive;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::FileOptions;

use crate::model::{TranscriptFile, TranscriptMetadata};
use crate::{Error, Result};

pub const AUDIO_ENTRY: &str = "originalAudio";
pub const METADATA_ENTRY: &str = "metadata.json";

/// Upper bound on how much we preallocate per member before reading it.
const MAX_PREALLOC: u64 = 64 << 20;

/// A decoded `.whisper` container. Unlike [`TranscriptFile`], audio is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct WhisperFile {
    pub original_audio: Vec<u8>,
    pub metadata: TranscriptMetadata,
}

impl From<WhisperFile> for TranscriptFile {
    fn from(file: WhisperFile) -> Self {
        Self {
            original_audio: Some(file.original_audio),
            metadata: file.metadata,
        }
    }
}

fn read_entry<R>(archive: &mut ZipArchive<R>, name: &'static str) -> Result<Vec<u8>>
where
    R: Read + std::io::Seek,
{
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Err(Error::MissingEntry(name)),
        Err(err) => return Err(err.into()),
    };

    // The declared size comes from the archive header and is only a hint.
    let hint = entry.size().min(MAX_PREALLOC);
    let mut buf = Vec::with_capacity(usize::try_from(hint).unwrap_or(0));
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Decode a `.whisper` container from memory.
pub fn read_whisper_file(bytes: &[u8]) -> Result<WhisperFile> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let original_audio = read_entry(&mut archive, AUDIO_ENTRY)?;
    let metadata_bytes = read_entry(&mut archive, METADATA_ENTRY)?;
    let metadata: TranscriptMetadata =
        serde_json::from_slice(&metadata_bytes).map_err(Error::MalformedMetadata)?;

    tracing::debug!(
        audio_bytes = original_audio.len(),
        transcripts = metadata.transcripts.len(),
        speakers = metadata.speakers.len(),
        "decoded whisper container"
    );

    Ok(WhisperFile {
        original_audio,
        metadata,
    })
}

/// Encode a `.whisper` container. Both members are always written.
pub fn write_whisper_file(file: &WhisperFile) -> Result<Vec<u8>> {
    let metadata = serde_json::to_vec(&file.metadata)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(AUDIO_ENTRY, options)?;
    zip.write_all(&file.original_audio)?;

    zip.start_file(METADATA_ENTRY, options)?;
    zip.write_all(&metadata)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Speaker, StartTimeOffset, Transcript};

    fn metadata() -> TranscriptMetadata {
        let alice = Speaker {
            id: "alice".into(),
            name: "Alice".into(),
            color: 2,
        };
        TranscriptMetadata {
            speakers: vec![alice.clone()],
            transcripts: vec![Transcript {
                id: "A1B2".into(),
                start: 0,
                end: 1_250,
                text: "Hello there".into(),
                speaker: alice,
                favorited: true,
                un_even: true,
            }],
            detected_language_raw: "english".into(),
            model_engine: "whisperkit".into(),
            model_language_id: "en".into(),
            model_quality_id: "large-v3".into(),
            was_translated_to_english: false,
            original_media_extension: "m4a".into(),
            original_media_filename: "Interview".into(),
            start_time_offset: StartTimeOffset {
                hours: 0,
                minutes: 1,
                seconds: 2,
                milliseconds: 3,
            },
            date_created: 1_700_000_000_000,
            date_updated: 1_700_000_500_000,
        }
    }

    fn zip_with(entries: &[(&str, &[u8])]) -> anyhow::Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            zip.start_file(*name, FileOptions::default())?;
            zip.write_all(data)?;
        }
        Ok(zip.finish()?.into_inner())
    }

    #[test]
    fn round_trip_preserves_audio_and_metadata() -> anyhow::Result<()> {
        let original = WhisperFile {
            original_audio: (0..=255u8).cycle().take(4_096).collect(),
            metadata: metadata(),
        };

        let bytes = write_whisper_file(&original)?;
        let decoded = read_whisper_file(&bytes)?;

        assert_eq!(decoded.original_audio, original.original_audio);
        assert_eq!(decoded.metadata, original.metadata);
        Ok(())
    }

    #[test]
    fn empty_audio_round_trips() -> anyhow::Result<()> {
        let original = WhisperFile {
            original_audio: Vec::new(),
            metadata: metadata(),
        };
        let decoded = read_whisper_file(&write_whisper_file(&original)?)?;
        assert!(decoded.original_audio.is_empty());
        Ok(())
    }

    #[test]
    fn missing_metadata_entry() -> anyhow::Result<()> {
        let bytes = zip_with(&[(AUDIO_ENTRY, b"RIFF")])?;
        let err = read_whisper_file(&bytes).unwrap_err();
        assert!(matches!(err, Error::MissingEntry(METADATA_ENTRY)), "{err:?}");
        Ok(())
    }

    #[test]
    fn missing_audio_entry() -> anyhow::Result<()> {
        let json = serde_json::to_vec(&metadata())?;
        let bytes = zip_with(&[(METADATA_ENTRY, &json)])?;
        let err = read_whisper_file(&bytes).unwrap_err();
        assert!(matches!(err, Error::MissingEntry(AUDIO_ENTRY)), "{err:?}");
        Ok(())
    }

    #[test]
    fn unparsable_metadata() -> anyhow::Result<()> {
        let bytes = zip_with(&[(AUDIO_ENTRY, b""), (METADATA_ENTRY, b"{not json")])?;
        let err = read_whisper_file(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)), "{err:?}");
        Ok(())
    }

    #[test]
    fn metadata_missing_required_fields() -> anyhow::Result<()> {
        let bytes = zip_with(&[
            (AUDIO_ENTRY, b""),
            (METADATA_ENTRY, br#"{"speakers":[],"transcripts":[]}"#),
        ])?;
        let err = read_whisper_file(&bytes).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)), "{err:?}");
        Ok(())
    }

    #[test]
    fn oversized_declared_member_size_reads_actual_bytes() -> anyhow::Result<()> {
        let json = serde_json::to_vec(&metadata())?;
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        zip.start_file(AUDIO_ENTRY, stored)?;
        zip.write_all(b"RIFF")?;
        zip.start_file(METADATA_ENTRY, stored)?;
        zip.write_all(&json)?;
        let mut bytes = zip.finish()?.into_inner();

        // Claim ~2 GiB of uncompressed audio in the central directory record.
        let header = bytes
            .windows(4)
            .position(|w| w == [0x50, 0x4b, 0x01, 0x02])
            .ok_or_else(|| anyhow::anyhow!("no central directory header"))?;
        bytes[header + 24..header + 28].copy_from_slice(&0x7fff_ffffu32.to_le_bytes());

        let decoded = read_whisper_file(&bytes)?;
        assert_eq!(decoded.original_audio, b"RIFF");
        Ok(())
    }

    #[test]
    fn non_zip_bytes_are_an_archive_error() {
        let err = read_whisper_file(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, Error::Archive(_)), "{err:?}");
    }
}
