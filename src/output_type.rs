/// The supported output formats for a rendered transcript.
///
/// A single, strongly-typed representation of output formats shared by the CLI and library
/// code. Each variant maps to a concrete `TranscriptEncoder` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Human-readable lines, preceded by a summary header.
    #[default]
    Text,

    /// Entries as a JSON array.
    Json,

    /// WebVTT with cue identifiers and voice tags.
    Vtt,
}
