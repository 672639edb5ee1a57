use circura_core::Config;
use tracing_subscriber::EnvFilter;

/// `CIRCURA_LOG` wins over the config file's `logging.filter`.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("CIRCURA_LOG")
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
