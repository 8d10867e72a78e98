//! The canonical transcript model shared by every source format.
//!
//! Field names serialize to the exact camelCase keys used inside `.whisper` containers
//! (`modelLanguageID`, `unEven`, ...), so these types double as the `metadata.json` schema.
//! Every field is required on deserialize; a container missing one is malformed.

use serde::{Deserialize, Serialize};

/// A person (or the reserved unknown speaker) attributed to transcript entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Speaker {
    pub id: String,
    pub name: String,
    pub color: u32,
}

/// One timed, speaker-attributed line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub id: String,
    /// Start time in ms.
    pub start: u64,
    /// End time in ms.
    pub end: u64,
    pub text: String,
    pub speaker: Speaker,
    pub favorited: bool,
    pub un_even: bool,
}

/// Offset of the transcript's zero point within the original recording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTimeOffset {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

/// The metadata document stored as `metadata.json` inside a `.whisper` container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMetadata {
    pub speakers: Vec<Speaker>,
    pub transcripts: Vec<Transcript>,
    pub detected_language_raw: String,
    pub model_engine: String,
    #[serde(rename = "modelLanguageID")]
    pub model_language_id: String,
    #[serde(rename = "modelQualityID")]
    pub model_quality_id: String,
    pub was_translated_to_english: bool,
    pub original_media_extension: String,
    pub original_media_filename: String,
    pub start_time_offset: StartTimeOffset,
    /// Epoch milliseconds.
    pub date_created: i64,
    /// Epoch milliseconds.
    pub date_updated: i64,
}

/// A fully loaded transcript: metadata plus the audio it was made from, when available.
///
/// Native containers always carry audio. VTT sources carry it only when a sibling audio file
/// was found next to the `.vtt`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptFile {
    pub original_audio: Option<Vec<u8>>,
    pub metadata: TranscriptMetadata,
}

impl TranscriptFile {
    /// MIME type the presentation layer should use for `original_audio`.
    ///
    /// We only know the real container format when metadata records a concrete extension;
    /// otherwise we fall back to `audio/wav`, which is what `.whisper` producers embed.
    pub fn audio_mime(&self) -> &'static str {
        match self
            .metadata
            .original_media_extension
            .to_ascii_lowercase()
            .as_str()
        {
            "mp3" => "audio/mpeg",
            "m4a" | "aac" => "audio/mp4",
            "webm" => "audio/webm",
            "ogg" => "audio/ogg",
            _ => "audio/wav",
        }
    }
}
