use tracing_subscriber::EnvFilter;

/// Logs go to stderr so they never interleave with the transcript on stdout.
pub fn init_tracing() {
    let filter = std::env::var("AIR_QUALITY_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info,air_quality_console=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}
