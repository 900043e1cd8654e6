//! Observability (logging)
//!
//! Structured logging via `tracing`. Diagnostics go to stderr so they never
//! mix with the generated-file listing printed on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging
///
/// `RUST_LOG` wins when set. Otherwise the filter follows the `-v` count:
/// 0 → `warn`, 1 → `info`, 2 or more → `debug` for this crate.
///
/// # Example
///
/// ```rust,no_run
/// use pattern_forge::observability;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// observability::init(1)?;
/// tracing::info!("pattern-forge started");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(verbosity: u8) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .without_time()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}

/// Filter directive for a verbosity level
#[must_use]
pub const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "warn,pattern_forge=debug,pattern_forge_cli_lib=debug",
    }
}
