use tracing_subscriber::EnvFilter;

/// Sends `tracing` output to stderr, leaving stdout for the report.
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}
