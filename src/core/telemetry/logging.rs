use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Output goes to stderr so shell output on
/// stdout stays clean.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
