//! Tracing setup for the command-line front end.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "REFUND_ENGINE_LOG";

/// Initialize tracing with the REFUND_ENGINE_LOG environment variable.
///
/// Defaults to "warn", or "debug" when `verbose` is set. Logs go to stderr
/// so that stdout only carries results.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
