//! Time-range selection over a transcript list.
//!
//! Inclusion is interval overlap, not containment: an entry that straddles either edge of the
//! window is part of the excerpt.

use crate::model::Transcript;
use crate::time_codec::TimeRange;

/// A (possibly ranged) view over a transcript list.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    entries: Vec<&'a Transcript>,
    total: usize,
    range: Option<TimeRange>,
}

/// Filter `transcripts` to the entries overlapping `range`. `None` selects everything.
pub fn select(transcripts: &[Transcript], range: Option<TimeRange>) -> Selection<'_> {
    let entries = match range {
        Some(range) => transcripts
            .iter()
            .filter(|t| range.overlaps(t.start, t.end))
            .collect(),
        None => transcripts.iter().collect(),
    };

    Selection {
        entries,
        total: transcripts.len(),
        range,
    }
}

/// Latest end time across `transcripts`, or 0 for an empty list.
pub fn total_duration(transcripts: &[Transcript]) -> u64 {
    transcripts.iter().map(|t| t.end).max().unwrap_or(0)
}

/// Index of the first entry whose `[start, end]` contains `position_ms`.
///
/// This is what a player uses to highlight the line being spoken.
pub fn active_index(entries: &[&Transcript], position_ms: u64) -> Option<usize> {
    entries
        .iter()
        .position(|t| position_ms >= t.start && position_ms <= t.end)
}

impl<'a> Selection<'a> {
    pub fn entries(&self) -> &[&'a Transcript] {
        &self.entries
    }

    pub fn range(&self) -> Option<TimeRange> {
        self.range
    }

    /// Number of entries in the view.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the underlying transcript, regardless of range.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Display duration: the window length when ranged, otherwise the latest end time.
    pub fn duration_ms(&self) -> u64 {
        match self.range {
            Some(range) => range.duration_ms(),
            None => self
                .entries
                .iter()
                .map(|t| t.end)
                .max()
                .unwrap_or(0),
        }
    }

    /// `"N"` for a full view, `"N (of M)"` when a range is active.
    pub fn segments_label(&self) -> String {
        match self.range {
            Some(_) => format!("{} (of {})", self.len(), self.total),
            None => self.len().to_string(),
        }
    }

    pub fn active_index(&self, position_ms: u64) -> Option<usize> {
        active_index(&self.entries, position_ms)
    }
}
