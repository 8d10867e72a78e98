use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use std::io;

use whisper_transcript::embed::parse_embed_src;
use whisper_transcript::time_codec::parse_time_range;
use whisper_transcript::viewer::write_transcript;
use whisper_transcript::{FsSource, Opts, OutputType, load_transcript_file};

fn main() {
    whisper_transcript::init_logging();

    if let Err(err) = run() {
        // Fatal load errors replace the transcript with a single inline error line.
        error!(error = ?err, "transcript-cli failed");
        eprintln!("Error loading transcript: {err:#}");
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(name = "transcript-cli")]
#[command(about = "Render .whisper and .vtt transcripts")]
struct Params {
    /// Transcript to load, optionally with an excerpt suffix (`call.whisper#01:30-02:45`).
    #[arg(short = 'i', long = "input")]
    input: String,

    /// Excerpt window (`MM:SS-MM:SS`). Overrides any `#range` suffix on the input.
    #[arg(short = 'r', long = "range")]
    range: Option<String>,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Text
    )]
    output_type: OutputType,

    /// Skip the language/model/duration summary in text output.
    #[arg(long = "no-header", default_value_t = false)]
    no_header: bool,
}

fn run() -> Result<()> {
    let params = Params::parse();

    let embed = parse_embed_src(&params.input);
    let time_range = match params.range.as_deref() {
        Some(range) => Some(parse_time_range(range).context("invalid --range")?),
        None => embed.time_range,
    };

    let source = FsSource::new(&embed.file_path);
    let file = load_transcript_file(&source, &source.sibling_audio())
        .with_context(|| format!("failed to load '{}'", embed.file_path))?;

    let opts = Opts {
        time_range,
        output_type: params.output_type,
        show_header: !params.no_header,
    };

    let stdout = io::stdout();
    write_transcript(&file, stdout.lock(), &opts)?;
    Ok(())
}
