//! Conversions between human time strings and integer milliseconds.
//!
//! Two families of input live here:
//! - `M:SS` / `MM:SS` strings typed by people (embed ranges such as `#01:30-02:45`)
//! - WebVTT timestamps (`SS.mmm`, `MM:SS.mmm`, `HH:MM:SS.mmm`)
//!
//! Everything is expressed in `u64` milliseconds so callers never deal with float drift.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A half-open millisecond window `[start, end)`.
///
/// Constructed through [`TimeRange::new`] or [`parse_time_range`], which both enforce
/// `start < end`. Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: u64,
    end: u64,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = Error;

    fn try_from(raw: RawTimeRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeRange {
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start >= end {
            return Err(Error::format(
                "invalid time range: start time must be before end time",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn duration_ms(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Whether `[start, end]` intersects this window.
    pub fn overlaps(&self, start: u64, end: u64) -> bool {
        start < self.end && end > self.start
    }
}

/// Parse `M:SS` or `MM:SS` into milliseconds.
pub fn parse_time_to_ms(s: &str) -> Result<u64> {
    let invalid = || Error::format(s.to_owned());

    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(invalid());
    }

    // `u64` parsing rejects signs, so negative components fail here too.
    let minutes: u64 = parts[0].trim().parse().map_err(|_| invalid())?;
    let seconds: u64 = parts[1].trim().parse().map_err(|_| invalid())?;
    if seconds >= 60 {
        return Err(invalid());
    }

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .and_then(|total| total.checked_mul(1000))
        .ok_or_else(invalid)
}

/// Format milliseconds as `M:SS`, flooring to whole seconds. Hours are folded into minutes.
pub fn format_time_from_ms(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes}:{seconds:02}")
}

/// Format milliseconds for display: `M:SS`, or `H:MM:SS` once the value reaches an hour.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Parse a WebVTT timestamp (`SS.mmm`, `MM:SS.mmm` or `HH:MM:SS.mmm`) into milliseconds.
///
/// Only the fractional part is lenient: a missing or unparsable fraction counts as 0 ms.
/// Every integer component must parse.
pub fn time_string_to_ms(s: &str) -> Result<u64> {
    let s = s.trim();
    let invalid = || Error::format(format!("bad timestamp '{s}'"));

    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };

    let millis = fraction
        .and_then(|f| f.parse::<u64>().ok())
        .unwrap_or(0);

    let components = whole
        .split(':')
        .map(|p| p.parse::<u64>())
        .collect::<std::result::Result<Vec<u64>, _>>()
        .map_err(|_| invalid())?;

    // Fold `[h, m, s]`, `[m, s]` or `[s]` into seconds, base 60 per step.
    if components.is_empty() || components.len() > 3 {
        return Err(invalid());
    }
    components
        .iter()
        .try_fold(0u64, |acc, &c| acc.checked_mul(60)?.checked_add(c))
        .and_then(|seconds| seconds.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(invalid)
}

/// Parse `MM:SS-MM:SS` into a [`TimeRange`].
pub fn parse_time_range(s: &str) -> Result<TimeRange> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 2 {
        return Err(Error::format(format!("invalid time range format: {s}")));
    }

    let start = parse_time_to_ms(parts[0].trim())?;
    let end = parse_time_to_ms(parts[1].trim())?;
    TimeRange::new(start, end)
}
