use thiserror::Error;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
///
/// Severity, from the caller's point of view:
/// - `Format` is recoverable: callers typically drop the optional feature (e.g. a time-range
///   suffix) and carry on.
/// - `UnsupportedExtension`, `MissingEntry`, `MalformedMetadata` and `Archive` are fatal for the
///   file being loaded.
/// - `Io` comes from collaborators; auxiliary lookups log it and degrade instead of failing.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed time string, time range, or VTT timing line.
    #[error("invalid time format: {0}")]
    Format(String),

    /// The file extension is not one of the supported transcript formats.
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// A required member is absent from a `.whisper` container.
    #[error("container is missing required entry '{0}'")]
    MissingEntry(&'static str),

    /// The container's `metadata.json` does not parse or omits required fields.
    #[error("malformed metadata: {0}")]
    MalformedMetadata(#[source] serde_json::Error),

    /// The container bytes are not a readable ZIP archive.
    #[error("invalid container archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Message(err.to_string())
    }
}
