//! Subscriber setup shared by the gift service and its migration bin.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the JSON stdout subscriber. Verbosity comes from `RUST_LOG`;
/// the gift service calls this first thing in `main`.
///
/// Repeated calls are no-ops, so test binaries may call it freely.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}
