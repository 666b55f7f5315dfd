//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins when set; otherwise the
/// default level is `warn`, raised to `debug` for this crate by `--debug`.
/// Diagnostics go to stderr so command output stays pipeable.
pub fn init(debug: bool) {
    let fallback = if debug { "cardex=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
