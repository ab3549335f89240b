//! Logging setup for the devserve CLI.
//!
//! Built on the `tracing` ecosystem. Verbosity comes from the global CLI
//! flags, with `RUST_LOG` as the escape hatch for precise filtering.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Call once at startup, before anything logs. Level resolution order:
/// `--verbose` (debug for devserve crates), `--quiet` (errors only),
/// `RUST_LOG`, then the info-level default.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("devserve=debug,devserve_cli=debug,devserve_config=debug")
    } else if quiet {
        EnvFilter::new("devserve=error,devserve_cli=error,devserve_config=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("devserve=info,devserve_cli=info,devserve_config=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
