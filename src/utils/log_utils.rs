use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber. `log` records from the services are bridged
/// into it; `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
