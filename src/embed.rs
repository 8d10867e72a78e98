//! Embed references as they appear in host documents: `path/to/file.ext[#MM:SS-MM:SS]`.

use tracing::warn;

use crate::time_codec::{TimeRange, parse_time_range};

/// A parsed embed reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSrc {
    pub file_path: String,
    pub time_range: Option<TimeRange>,
}

/// Split an embed reference into its file path and optional time range.
///
/// The time-range suffix is optional sugar, so a malformed one never fails the embed: we log a
/// warning and fall back to the whole file. With more than one `#` we keep only the path.
pub fn parse_embed_src(src: &str) -> EmbedSrc {
    let parts: Vec<&str> = src.split('#').collect();
    let file_path = parts[0].to_owned();

    let time_range = match parts.as_slice() {
        [_, range] => match parse_time_range(range) {
            Ok(range) => Some(range),
            Err(err) => {
                warn!(range = %range, error = %err, "ignoring malformed embed time range");
                None
            }
        },
        _ => None,
    };

    EmbedSrc {
        file_path,
        time_range,
    }
}
