//! Parsed WebVTT sections → canonical transcripts and speakers.

use chrono::Utc;
use uuid::Uuid;

use crate::model::{Speaker, Transcript};
use crate::speaker::SpeakerRegistry;
use crate::vtt::VttSection;

/// The canonical pieces derived from a VTT source.
///
/// VTT has no model/language metadata of its own, so the loader fills in the rest of
/// [`crate::model::TranscriptMetadata`] around this.
#[derive(Debug, Clone, PartialEq)]
pub struct VttTranscript {
    pub transcripts: Vec<Transcript>,
    pub speakers: Vec<Speaker>,
    pub original_media_filename: String,
    pub date_created: i64,
    pub date_updated: i64,
}

/// Map VTT sections onto the canonical model.
///
/// Speakers are registered in first-seen order; sections without a voice tag are attributed to
/// the unknown speaker. Entry ids come from cue identifiers when present, else a fresh UUID.
pub fn vtt_to_transcript(sections: &[VttSection], filename: &str) -> VttTranscript {
    let mut registry = SpeakerRegistry::new();
    for name in sections.iter().filter_map(|s| s.speaker.as_deref()) {
        registry.register(name);
    }

    let transcripts = sections
        .iter()
        .map(|section| Transcript {
            id: section
                .cue_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            start: section.start,
            end: section.end,
            text: section.part.clone(),
            speaker: registry.resolve(section.speaker.as_deref()).clone(),
            favorited: false,
            un_even: false,
        })
        .collect();

    let now = Utc::now().timestamp_millis();

    VttTranscript {
        transcripts,
        speakers: registry.into_speakers(),
        original_media_filename: filename
            .strip_suffix(".vtt")
            .unwrap_or(filename)
            .to_owned(),
        date_created: now,
        date_updated: now,
    }
}
