//! Developer diagnostics for the installer.
//!
//! Tracing output is controlled by `RUST_LOG` and goes to stderr. The
//! progress lines a user sees ("Detected nodecg installation at ...") are
//! printed by the commands themselves and are not affected by it.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, defaulting to `warn`. `verbose` raises the default to
/// `info` for this crate when `RUST_LOG` is unset.
///
/// # Example
/// ```bash
/// RUST_LOG=installer=debug nodecg-io install --dev
/// ```
pub fn init(verbose: bool) {
    let default = if verbose { "warn,installer=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
