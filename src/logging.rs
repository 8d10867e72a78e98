use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize structured JSON logging on stderr.
///
/// Defaults to `error` level unless overridden by `WHISPER_TRANSCRIPT_LOG`
/// (e.g. `WHISPER_TRANSCRIPT_LOG=whisper_transcript=debug`). Stdout stays reserved for the
/// rendered transcript.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var("WHISPER_TRANSCRIPT_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::ERROR.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
