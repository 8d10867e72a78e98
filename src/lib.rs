//! `whisper-transcript`: parse speech transcripts into one speaker-attributed, time-indexed model.
//!
//! This crate provides:
//! - A WebVTT parser (voice tags, cue identifiers, inline word timestamps)
//! - A codec for `.whisper` containers (ZIP: original audio + JSON metadata)
//! - Adaptation of VTT cues into canonical transcripts with deterministic speaker colors
//! - Time-range selection for excerpts (`file.whisper#01:30-02:45`)
//! - Pluggable output encoders (text, JSON, VTT)
//!
//! All parsing is synchronous and pure over in-memory buffers. File access is injected through
//! the traits in [`source`], so hosts decide how references resolve to bytes.

// High-level API (most consumers should start here).
pub mod opts;
pub mod source;
pub mod viewer;

// Canonical model.
pub mod model;
pub mod speaker;

// Parsing and conversion.
pub mod adapter;
pub mod container;
pub mod embed;
pub mod time_codec;
pub mod vtt;

// Excerpting.
pub mod selection;

// Output selection and encoder interfaces.
pub mod output_type;
pub mod transcript_encoder;

// Output encoders that serialize transcripts into various formats.
pub mod json_array_encoder;
pub mod text_encoder;
pub mod vtt_encoder;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use error::{Error, Result};
pub use model::{Speaker, Transcript, TranscriptFile, TranscriptMetadata};
pub use opts::Opts;
pub use output_type::OutputType;
pub use source::{FsSource, TranscriptSource, load_transcript_file};
pub use time_codec::TimeRange;

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
