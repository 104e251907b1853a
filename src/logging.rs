//! Diagnostic tracing for the CLI.
//!
//! User-facing outcomes go through the notification sink, not through here.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset. Output goes to stderr.
///
/// # Example
/// ```bash
/// RUST_LOG=account_payments=debug account-payments --accounts accounts.csv session.txt
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
