//! Tracing setup for the CLI

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so record output on stdout stays pipeable; verbosity is
/// controlled through `RUST_LOG`.
pub fn init_tracing_subscriber() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(console_layer).init();
}
