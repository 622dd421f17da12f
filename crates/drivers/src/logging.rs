use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber on stderr.
///
/// `RUST_LOG` wins over `default_filter`. Failure only disables logging.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(error) = result {
        eprintln!("logging disabled: {error}");
    }
}
