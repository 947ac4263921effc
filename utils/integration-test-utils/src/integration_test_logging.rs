use tracing_subscriber::EnvFilter;

/// Installs a test-friendly `tracing` subscriber once per process.
///
/// Honours `RUST_LOG`; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
