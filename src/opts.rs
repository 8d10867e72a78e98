use crate::output_type::OutputType;
use crate::time_codec::TimeRange;

/// Options that control how a loaded transcript is rendered.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that other frontends
/// (embed renderers, tests, batch jobs) can construct options programmatically.
#[derive(Debug, Clone, Default)]
pub struct Opts {
    /// Restrict output to entries overlapping this window.
    ///
    /// `None` renders the whole transcript.
    pub time_range: Option<TimeRange>,

    /// The desired output format.
    pub output_type: OutputType,

    /// Whether to print the language/model/duration/segments summary before the entries.
    ///
    /// Only honored for [`OutputType::Text`]; machine-readable formats never get a header.
    pub show_header: bool,
}
