//! WebVTT → timed sections.
//!
//! This is a line-oriented scanner, not a full WebVTT implementation. It understands:
//! - cue timing lines (`start --> end [settings]`)
//! - optional cue identifiers on the line before a timing line
//! - `<v Speaker>` voice tags (the first one in a cue wins)
//! - inline `<HH:MM:SS.mmm>` word markers, as emitted by karaoke-style captioners
//!
//! Captioners that animate word highlighting re-emit the same line across consecutive cues; we
//! drop a content line when its de-tagged text equals the previous section's text.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::Result;
use crate::time_codec::time_string_to_ms;

const TIME_SEPARATOR: &str = "-->";

/// Internal delimiter that inline time markers are rewritten into before word splitting.
///
/// Known limitation: a word that legitimately contains `==` is read as carrying a timestamp.
const TIME_MARKER_PREFIX: &str = "==";

/// Tokens that carry nothing once markers and tags are gone.
const EMPTY_TOKENS: [&str; 3] = ["", " ", "##"];

/// A single word and, when the source had an inline marker for it, its time in ms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VttWord {
    pub word: String,
    pub time: Option<u64>,
}

/// One cue block of a WebVTT file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VttSection {
    pub start: u64,
    pub end: u64,
    /// Cue text with all markup removed.
    pub part: String,
    pub words: Vec<VttWord>,
    pub speaker: Option<String>,
    pub cue_id: Option<String>,
}

fn html_tag_regex() -> &'static Regex {
    static HTML_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    HTML_TAG_REGEX
        .get_or_init(|| Regex::new(r"</?[^>]+(>|$)").expect("Failed to compile HTML tag regex"))
}

fn time_marker_regex() -> &'static Regex {
    static TIME_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    TIME_MARKER_REGEX
        .get_or_init(|| Regex::new(r"<[0-9:.>]+>").expect("Failed to compile time marker regex"))
}

fn speaker_regex() -> &'static Regex {
    static SPEAKER_REGEX: OnceLock<Regex> = OnceLock::new();
    SPEAKER_REGEX
        .get_or_init(|| Regex::new(r"(?i)<v\s+([^>]+)>").expect("Failed to compile speaker regex"))
}

fn strip_html_tags(text: &str) -> String {
    html_tag_regex().replace_all(text, "").into_owned()
}

/// Pull the first voice tag out of a content line.
fn extract_speaker(text: &str) -> (Option<String>, String) {
    match speaker_regex().captures(text) {
        Some(caps) => {
            let speaker = caps[1].trim().to_owned();
            let clean = speaker_regex().replace(text, "").trim().to_owned();
            (Some(speaker), clean)
        }
        None => (None, text.to_owned()),
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_timestamp_line(line: &str) -> bool {
    line.contains(TIME_SEPARATOR)
}

/// Lines outside a cue that can never be a cue identifier.
fn is_block_keyword(line: &str) -> bool {
    let line = line.trim_start_matches('\u{FEFF}').trim();
    ["WEBVTT", "NOTE", "STYLE", "REGION"]
        .iter()
        .any(|kw| line.starts_with(kw))
}

fn is_file_header(line: &str) -> bool {
    line.trim_start_matches('\u{FEFF}').starts_with("WEBVTT")
}

/// Parse the start/end of a timing line, ignoring any cue settings after the end time.
fn parse_timing_line(line: &str) -> Result<(u64, u64)> {
    let (before, after) = line.split_once(TIME_SEPARATOR).unwrap_or((line, ""));
    let start = before.split_whitespace().last().unwrap_or("");
    let end = after.split_whitespace().next().unwrap_or("");
    Ok((time_string_to_ms(start)?, time_string_to_ms(end)?))
}

fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '\'' || *c == '-')
        .collect::<String>()
        .to_lowercase()
}

fn parse_word_with_time(item: &str) -> Option<VttWord> {
    if !item.contains(TIME_MARKER_PREFIX) {
        return Some(VttWord {
            word: clean_word(item),
            time: None,
        });
    }

    let mut pieces = item.split(TIME_MARKER_PREFIX);
    let word = pieces.next().unwrap_or("");
    let time = pieces.next().unwrap_or("");
    if EMPTY_TOKENS.contains(&word) {
        return None;
    }

    Some(VttWord {
        word: clean_word(word),
        time: time_string_to_ms(time).ok(),
    })
}

fn parse_words_with_timestamps(text: &str) -> Vec<VttWord> {
    let marked = text
        .split(' ')
        .map(|token| {
            time_marker_regex()
                .replace_all(token, |caps: &regex::Captures| {
                    let marker = caps[0].replacen('<', "", 1).replacen('>', "", 1);
                    format!("{TIME_MARKER_PREFIX}{marker}")
                })
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join(" ");

    strip_html_tags(&marked)
        .split(' ')
        .filter(|token| !token.is_empty())
        .filter_map(parse_word_with_time)
        .collect()
}

/// A cue whose boundaries are known but whose words haven't been derived yet.
#[derive(Debug, Default)]
struct RawCue {
    start: u64,
    end: u64,
    part: String,
    speaker: Option<String>,
    cue_id: Option<String>,
    /// Set when a content line was dropped as a repeat of the previous section.
    had_duplicate: bool,
}

/// Sequential scanner state.
#[derive(Default)]
struct CueScanner {
    cues: Vec<RawCue>,
    current: Option<RawCue>,
    pending_id: Option<String>,
    /// Inside the `WEBVTT` header block, whose metadata lines are never cue identifiers.
    in_header: bool,
}

impl CueScanner {
    fn close_current(&mut self) {
        let Some(cue) = self.current.take() else {
            return;
        };
        // A cue made only of repeated lines is a re-emitted highlight, not a new section.
        if cue.had_duplicate && cue.part.is_empty() {
            return;
        }
        self.cues.push(cue);
    }

    fn feed(&mut self, line: &str) -> Result<()> {
        if is_blank(line) {
            self.close_current();
            self.pending_id = None;
            self.in_header = false;
            return Ok(());
        }

        if is_timestamp_line(line) {
            // A timing line without a preceding blank still starts a fresh cue.
            self.close_current();
            self.in_header = false;
            let (start, end) = parse_timing_line(line)?;
            self.current = Some(RawCue {
                start,
                end,
                cue_id: self.pending_id.take(),
                ..RawCue::default()
            });
            return Ok(());
        }

        let Some(current) = self.current.as_mut() else {
            if is_block_keyword(line) {
                self.in_header |= is_file_header(line);
            } else if !self.in_header {
                self.pending_id = Some(line.trim().to_owned());
            }
            return Ok(());
        };

        let (speaker, clean_text) = extract_speaker(line);
        let clean_line = strip_html_tags(&clean_text);

        if let Some(previous) = self.cues.last() {
            if strip_html_tags(&previous.part) == clean_line {
                current.had_duplicate = true;
                return Ok(());
            }
        }

        if current.speaker.is_none() {
            current.speaker = speaker;
        }

        if current.part.is_empty() {
            current.part = clean_text;
        } else {
            current.part.push(' ');
            current.part.push_str(&clean_text);
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<RawCue> {
        self.close_current();
        self.cues
    }
}

/// Parse a WebVTT document into ordered sections.
///
/// Empty or whitespace-only input (and a header with no cues) yields an empty list. Cues are
/// returned in source order; timestamps are not validated against each other.
pub fn parse_vtt(text: &str) -> Result<Vec<VttSection>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut scanner = CueScanner::default();
    for line in text.split('\n') {
        scanner.feed(line.trim_end_matches('\r'))?;
    }

    let sections = scanner
        .finish()
        .into_iter()
        .map(|cue| VttSection {
            start: cue.start,
            end: cue.end,
            words: parse_words_with_timestamps(&cue.part),
            part: strip_html_tags(&cue.part),
            speaker: cue.speaker,
            cue_id: cue.cue_id,
        })
        .collect::<Vec<_>>();

    tracing::debug!(sections = sections.len(), "parsed webvtt");
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_inputs_yield_no_sections() -> anyhow::Result<()> {
        assert!(parse_vtt("")?.is_empty());
        assert!(parse_vtt("   \n\t\n ")?.is_empty());
        assert!(parse_vtt("WEBVTT\n\n")?.is_empty());
        assert!(parse_vtt("WEBVTT - Some title\nKind: captions\n")?.is_empty());
        Ok(())
    }

    #[test]
    fn single_cue_with_voice_tag() -> anyhow::Result<()> {
        let sections = parse_vtt("00:00:01.000 --> 00:00:02.000\n<v Alice>Hello world")?;
        assert_eq!(sections.len(), 1);

        let s = &sections[0];
        assert_eq!(s.start, 1_000);
        assert_eq!(s.end, 2_000);
        assert_eq!(s.speaker.as_deref(), Some("Alice"));
        assert_eq!(s.part, "Hello world");
        assert_eq!(s.cue_id, None);
        Ok(())
    }

    #[test]
    fn cue_without_voice_tag_has_no_speaker() -> anyhow::Result<()> {
        let sections = parse_vtt("WEBVTT\n\n00:01.000 --> 00:02.500\nJust text\n")?;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].speaker, None);
        assert_eq!(sections[0].start, 1_000);
        assert_eq!(sections[0].end, 2_500);
        Ok(())
    }

    #[test]
    fn multi_line_cue_joins_with_single_space() -> anyhow::Result<()> {
        let vtt = "WEBVTT\n\n00:00:00.000 --> 00:00:03.000\n<v Bob>First line\n<i>second</i> line\n";
        let sections = parse_vtt(vtt)?;
        assert_eq!(sections[0].part, "First line second line");
        assert_eq!(sections[0].speaker.as_deref(), Some("Bob"));
        Ok(())
    }

    #[test]
    fn first_voice_tag_wins() -> anyhow::Result<()> {
        let vtt = "00:00:00.000 --> 00:00:03.000\n<v Bob>One\n<v Carol>Two\n";
        let sections = parse_vtt(vtt)?;
        assert_eq!(sections[0].speaker.as_deref(), Some("Bob"));
        assert_eq!(sections[0].part, "One Two");
        Ok(())
    }

    #[test]
    fn duplicate_consecutive_lines_emit_one_section() -> anyhow::Result<()> {
        let vtt = "WEBVTT\n\n\
            00:00:01.000 --> 00:00:02.000\n\
            hello <c>there</c>\n\n\
            00:00:02.000 --> 00:00:03.000\n\
            hello there\n\n\
            00:00:03.000 --> 00:00:04.000\n\
            general kenobi\n";
        let sections = parse_vtt(vtt)?;
        assert_eq!(sections.len(), 2);

        let spans: Vec<(u64, &str)> = sections.iter().map(|s| (s.start, s.part.as_str())).collect();
        assert_eq!(spans, vec![(1_000, "hello there"), (3_000, "general kenobi")]);
        Ok(())
    }

    #[test]
    fn repeated_highlight_cues_collapse() -> anyhow::Result<()> {
        let vtt = "WEBVTT\n\n\
            00:00:01.000 --> 00:00:02.000\n\
            <v Alice>hello there\n\n\
            00:00:02.000 --> 00:00:03.000\n\
            <v Alice>hello there\n\n\
            00:00:03.000 --> 00:00:04.000\n\
            <v Alice>hello there\n\n\
            00:00:04.000 --> 00:00:05.000\n\
            <v Bob>bye\n";
        let sections = parse_vtt(vtt)?;
        let parts: Vec<&str> = sections.iter().map(|s| s.part.as_str()).collect();
        assert_eq!(parts, vec!["hello there", "bye"]);
        assert!(sections.iter().all(|s| !s.part.is_empty()));
        Ok(())
    }

    #[test]
    fn repeated_line_with_new_text_keeps_the_new_text() -> anyhow::Result<()> {
        let vtt = "00:00:01.000 --> 00:00:02.000\nhello there\n\n\
            00:00:02.000 --> 00:00:03.000\nhello there\nand more\n";
        let sections = parse_vtt(vtt)?;
        let parts: Vec<&str> = sections.iter().map(|s| s.part.as_str()).collect();
        assert_eq!(parts, vec!["hello there", "and more"]);
        Ok(())
    }

    #[test]
    fn settings_after_end_time_are_ignored() -> anyhow::Result<()> {
        let vtt = "00:00:05.250 --> 00:00:07.000 align:start position:10%\ntext";
        let sections = parse_vtt(vtt)?;
        assert_eq!((sections[0].start, sections[0].end), (5_250, 7_000));
        Ok(())
    }

    #[test]
    fn crlf_line_endings() -> anyhow::Result<()> {
        let vtt = "WEBVTT\r\n\r\n00:00:01.000 --> 00:00:02.000\r\n<v Alice>Hi\r\n\r\n";
        let sections = parse_vtt(vtt)?;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].part, "Hi");
        Ok(())
    }

    #[test]
    fn out_of_order_cues_keep_source_order() -> anyhow::Result<()> {
        let vtt = "00:00:10.000 --> 00:00:11.000\nlater\n\n00:00:01.000 --> 00:00:02.000\nearlier\n";
        let sections = parse_vtt(vtt)?;
        let starts: Vec<u64> = sections.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![10_000, 1_000]);
        Ok(())
    }

    #[test]
    fn cue_identifiers_are_captured() -> anyhow::Result<()> {
        let vtt = "WEBVTT\n\nintro\n00:00:00.000 --> 00:00:01.000\nHi\n\n00:00:01.000 --> 00:00:02.000\nBye\n";
        let sections = parse_vtt(vtt)?;
        assert_eq!(sections[0].cue_id.as_deref(), Some("intro"));
        assert_eq!(sections[1].cue_id, None);
        Ok(())
    }

    #[test]
    fn header_directly_above_cue_is_not_an_identifier() -> anyhow::Result<()> {
        let sections = parse_vtt("WEBVTT\n00:00:00.000 --> 00:00:01.000\nHi\n")?;
        assert_eq!(sections[0].cue_id, None);
        Ok(())
    }

    #[test]
    fn header_metadata_is_not_an_identifier() -> anyhow::Result<()> {
        let vtt = "WEBVTT\nKind: captions\nLanguage: en\n00:00:00.000 --> 00:00:01.000\nHi\n";
        let sections = parse_vtt(vtt)?;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].cue_id, None);
        Ok(())
    }

    #[test]
    fn identifier_after_header_block_is_kept() -> anyhow::Result<()> {
        let vtt = "WEBVTT\nKind: captions\n\nfirst\n00:00:00.000 --> 00:00:01.000\nHi\n";
        let sections = parse_vtt(vtt)?;
        assert_eq!(sections[0].cue_id.as_deref(), Some("first"));
        Ok(())
    }

    #[test]
    fn huge_timestamp_component_is_a_format_error() {
        let err = parse_vtt("99999999999999999:00:00.000 --> 99999999999999999:00:01.000\nx")
            .unwrap_err();
        assert!(matches!(err, Error::Format(_)), "{err:?}");
    }

    #[test]
    fn timing_line_without_blank_starts_new_cue() -> anyhow::Result<()> {
        let vtt = "00:00:00.000 --> 00:00:01.000\nOne\n00:00:01.000 --> 00:00:02.000\nTwo\n";
        let sections = parse_vtt(vtt)?;
        let parts: Vec<&str> = sections.iter().map(|s| s.part.as_str()).collect();
        assert_eq!(parts, vec!["One", "Two"]);
        Ok(())
    }

    #[test]
    fn malformed_timing_line_is_a_format_error() {
        let err = parse_vtt("00:xx:01.000 --> 00:00:02.000\ntext").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn inline_markers_become_word_times() -> anyhow::Result<()> {
        let vtt = "00:00:01.000 --> 00:00:03.000\n\
            Hello<00:00:01.500><c> World!</c><00:00:02.250><c> it's</c>";
        let sections = parse_vtt(vtt)?;
        let s = &sections[0];

        assert_eq!(s.part, "Hello World! it's");
        assert_eq!(
            s.words,
            vec![
                VttWord {
                    word: "hello".into(),
                    time: Some(1_500)
                },
                VttWord {
                    word: "world".into(),
                    time: Some(2_250)
                },
                VttWord {
                    word: "it's".into(),
                    time: None
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn leading_marker_token_is_discarded() -> anyhow::Result<()> {
        let sections = parse_vtt("00:00:01.000 --> 00:00:02.000\n<00:00:01.100> go")?;
        let words: Vec<&str> = sections[0].words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["go"]);
        Ok(())
    }

    #[test]
    fn words_reconstruct_cleaned_text() -> anyhow::Result<()> {
        let sections = parse_vtt("00:00:00.000 --> 00:00:01.000\n<v Dee>Well, OK - fine.")?;
        let words: Vec<&str> = sections[0].words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["well", "ok", "-", "fine"]);
        Ok(())
    }
}
