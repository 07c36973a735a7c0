//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging with the `info` default.
///
/// Safe to call multiple times (subsequent calls are no-ops), so test
/// binaries can call it from every harness.
pub fn init() {
    init_with_default("info");
}

/// Initialize tracing/logging, falling back to `default_filter` when
/// `RUST_LOG` is unset.
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON logs + timestamps; auth flows log secrets never, identifiers only.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
