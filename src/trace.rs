//! Console diagnostics.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stdout subscriber. `RUST_LOG` overrides the default `seqsink=info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("seqsink=info"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}
