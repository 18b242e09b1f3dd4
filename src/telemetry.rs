//! Tracing setup for binaries and tests.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, honoring `RUST_LOG` and defaulting to
/// `info` for this crate. Safe to call more than once; later calls are a
/// no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trust_engine=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
