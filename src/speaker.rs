//! Deterministic speaker registration and color assignment.

use crate::model::Speaker;

/// Display colors (0xRRGGBB), indexed by palette position.
pub const SPEAKER_COLORS: [u32; 10] = [
    0xff6b6b, // red
    0x4ecdc4, // teal
    0x45b7d1, // blue
    0x96ceb4, // green
    0xffeaa7, // yellow
    0xdda0dd, // plum
    0xf7b731, // orange
    0x5f27cd, // purple
    0x00d2d3, // cyan
    0xff9ff3, // pink
];

pub const UNKNOWN_SPEAKER_ID: &str = "unknown";
pub const UNKNOWN_SPEAKER_NAME: &str = "Unknown Speaker";

/// The reserved default speaker at palette index 0.
pub fn unknown_speaker() -> Speaker {
    Speaker {
        id: UNKNOWN_SPEAKER_ID.to_owned(),
        name: UNKNOWN_SPEAKER_NAME.to_owned(),
        color: SPEAKER_COLORS[0],
    }
}

/// Stable id for a display name: lowercased, whitespace runs collapsed to `_`.
pub fn speaker_id(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Per-parse registry mapping raw speaker names to [`Speaker`]s.
///
/// Names are registered in first-seen order and take the next palette slot, wrapping modulo the
/// palette size. Slot 0 belongs to the unknown speaker, so the tenth named speaker wraps around
/// and shares its color. Colors are deterministic for one input, not across inputs.
#[derive(Debug, Clone)]
pub struct SpeakerRegistry {
    // (raw name key, speaker) in registration order; index 0 is always the unknown speaker.
    entries: Vec<(String, Speaker)>,
    next_index: usize,
}

impl Default for SpeakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerRegistry {
    pub fn new() -> Self {
        Self {
            entries: vec![(UNKNOWN_SPEAKER_ID.to_owned(), unknown_speaker())],
            next_index: 1,
        }
    }

    /// Register `name` if unseen and return its speaker.
    pub fn register(&mut self, name: &str) -> &Speaker {
        let pos = match self.entries.iter().position(|(key, _)| key == name) {
            Some(pos) => pos,
            None => {
                let speaker = Speaker {
                    id: speaker_id(name),
                    name: name.to_owned(),
                    color: SPEAKER_COLORS[self.next_index % SPEAKER_COLORS.len()],
                };
                self.next_index += 1;
                self.entries.push((name.to_owned(), speaker));
                self.entries.len() - 1
            }
        };
        &self.entries[pos].1
    }

    /// Look up a raw name, falling back to the unknown speaker.
    pub fn resolve(&self, name: Option<&str>) -> &Speaker {
        name.and_then(|name| self.entries.iter().find(|(key, _)| key == name))
            .map(|(_, speaker)| speaker)
            .unwrap_or(&self.entries[0].1)
    }

    pub fn unknown(&self) -> &Speaker {
        &self.entries[0].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All speakers in registration order, starting with the unknown speaker.
    pub fn into_speakers(self) -> Vec<Speaker> {
        self.entries.into_iter().map(|(_, speaker)| speaker).collect()
    }
}
