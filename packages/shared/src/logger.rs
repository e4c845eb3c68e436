//! Logger setup built on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, events from `crate_name` are
/// emitted at `default_level` and everything else at `warn`.
pub fn setup_logger(crate_name: &str, default_level: &str) {
    // Binary names use dashes, tracing targets use underscores
    let target = crate_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{target}={default_level},tower_http={default_level}"
        ))
    });

    // try_init: tests may call this more than once per process
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
