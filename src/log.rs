//! Diagnostic logging setup

use tracing_subscriber::{fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Output goes to stderr and stays off
/// unless `verbose` is set or `RUST_LOG` says otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().without_time().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
