use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line, for collectors reading stderr while stdout carries `--json` results.
    Json,
}

/// Logs go to stderr so stdout only carries status output.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let default_directive = if verbose {
        "permesso_tracker=debug,info"
    } else {
        "permesso_tracker=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
    }
}
