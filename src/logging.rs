use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter.
pub const LOG_ENV: &str = "SIDEKICK_LOG";

/// Install a stderr subscriber. Safe to call more than once.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
