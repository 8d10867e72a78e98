//! Loading transcript files through injected file-resolution collaborators.
//!
//! The core never touches a global file handle. Callers hand in:
//! - a [`TranscriptSource`] that has already been resolved from a logical reference
//! - an [`AudioLookup`] used to find a same-basename audio file next to `.vtt` sources
//!
//! Audio lookup is best effort. Any failure is logged and treated as "no audio"; only the
//! transcript itself can fail a load.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::adapter::vtt_to_transcript;
use crate::container::read_whisper_file;
use crate::model::{StartTimeOffset, TranscriptFile, TranscriptMetadata};
use crate::vtt::parse_vtt;
use crate::{Error, Result};

/// Audio extensions probed (in this order) when looking for a VTT file's recording.
pub const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "m4a", "webm", "ogg", "aac"];

/// Placeholder for metadata fields a VTT file has no way to express.
const UNKNOWN: &str = "unknown";

/// The transcript formats we know how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// ZIP container with audio and JSON metadata.
    Whisper,

    /// WebVTT captions.
    Vtt,
}

impl TranscriptFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "whisper" => Ok(Self::Whisper),
            "vtt" => Ok(Self::Vtt),
            _ => Err(Error::UnsupportedExtension(ext.to_owned())),
        }
    }
}

/// A resolved transcript file.
pub trait TranscriptSource {
    /// Extension without the leading dot.
    fn extension(&self) -> &str;

    /// File name including extension.
    fn file_name(&self) -> &str;

    /// File name without its extension.
    fn basename(&self) -> &str {
        let name = self.file_name();
        let ext = self.extension();
        if ext.is_empty() {
            return name;
        }
        name.strip_suffix(ext)
            .and_then(|rest| rest.strip_suffix('.'))
            .unwrap_or(name)
    }

    fn read_bytes(&self) -> Result<Vec<u8>>;

    fn read_text(&self) -> Result<String> {
        String::from_utf8(self.read_bytes()?)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
    }
}

/// Finds the recording that belongs to a VTT file.
pub trait AudioLookup {
    /// Return the bytes of a sibling audio file named `basename.<ext>`, if any.
    fn find_sibling_audio(&self, basename: &str) -> Result<Option<Vec<u8>>>;
}

/// An [`AudioLookup`] that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudio;

impl AudioLookup for NoAudio {
    fn find_sibling_audio(&self, _basename: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// A transcript file already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    file_name: String,
    extension: String,
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let extension = extension_of(Path::new(&file_name));
        Self {
            file_name,
            extension,
            data: data.into(),
        }
    }
}

impl TranscriptSource for MemorySource {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

/// A transcript file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsSource {
    path: PathBuf,
    file_name: String,
    extension: String,
}

impl FsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&path);
        Self {
            path,
            file_name,
            extension,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Audio lookup rooted at this file's directory.
    pub fn sibling_audio(&self) -> FsAudioLookup {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        FsAudioLookup::new(dir)
    }
}

impl TranscriptSource for FsSource {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// Probes `dir/<basename>.<ext>` for each of [`AUDIO_EXTENSIONS`].
#[derive(Debug, Clone)]
pub struct FsAudioLookup {
    dir: PathBuf,
}

impl FsAudioLookup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl AudioLookup for FsAudioLookup {
    fn find_sibling_audio(&self, basename: &str) -> Result<Option<Vec<u8>>> {
        for ext in AUDIO_EXTENSIONS {
            let candidate = self.dir.join(format!("{basename}.{ext}"));
            if !candidate.is_file() {
                continue;
            }

            match fs::read(&candidate) {
                Ok(bytes) => {
                    debug!(path = %candidate.display(), "found sibling audio");
                    return Ok(Some(bytes));
                }
                Err(err) => {
                    warn!(path = %candidate.display(), error = %err, "failed to read audio file");
                }
            }
        }
        Ok(None)
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build a [`TranscriptFile`] from VTT text that has already been read.
pub fn load_vtt_text(
    text: &str,
    file_name: &str,
    basename: &str,
    original_audio: Option<Vec<u8>>,
) -> Result<TranscriptFile> {
    let sections = parse_vtt(text)?;
    let converted = vtt_to_transcript(&sections, file_name);

    let original_media_filename = if converted.original_media_filename.is_empty() {
        basename.to_owned()
    } else {
        converted.original_media_filename
    };

    let metadata = TranscriptMetadata {
        speakers: converted.speakers,
        transcripts: converted.transcripts,
        detected_language_raw: UNKNOWN.to_owned(),
        model_engine: "vtt".to_owned(),
        model_language_id: UNKNOWN.to_owned(),
        model_quality_id: UNKNOWN.to_owned(),
        was_translated_to_english: false,
        original_media_extension: if original_audio.is_some() {
            UNKNOWN.to_owned()
        } else {
            String::new()
        },
        original_media_filename,
        start_time_offset: StartTimeOffset::default(),
        date_created: converted.date_created,
        date_updated: converted.date_updated,
    };

    Ok(TranscriptFile {
        original_audio,
        metadata,
    })
}

/// Load a transcript file, dispatching on its extension.
///
/// `.whisper` files are decoded as containers. `.vtt` files are parsed and adapted, and
/// `audio` is asked for a same-basename recording.
pub fn load_transcript_file<S, A>(source: &S, audio: &A) -> Result<TranscriptFile>
where
    S: TranscriptSource + ?Sized,
    A: AudioLookup + ?Sized,
{
    match TranscriptFormat::from_extension(source.extension())? {
        TranscriptFormat::Whisper => {
            let bytes = source.read_bytes()?;
            Ok(read_whisper_file(&bytes)?.into())
        }
        TranscriptFormat::Vtt => {
            let text = source.read_text()?;
            let basename = source.basename();

            let original_audio = match audio.find_sibling_audio(basename) {
                Ok(found) => found,
                Err(err) => {
                    warn!(basename, error = %err, "sibling audio lookup failed; continuing without audio");
                    None
                }
            };

            load_vtt_text(&text, source.file_name(), basename, original_audio)
        }
    }
}

/// Run [`load_transcript_file`] on tokio's blocking pool and resolve once with the result.
#[cfg(feature = "tokio")]
pub async fn load_transcript_file_async<S, A>(source: S, audio: A) -> Result<TranscriptFile>
where
    S: TranscriptSource + Send + 'static,
    A: AudioLookup + Send + 'static,
{
    tokio::task::spawn_blocking(move || load_transcript_file(&source, &audio))
        .await
        .map_err(|err| Error::msg(format!("transcript loader task failed: {err}")))?
}
