//! Log output for the binary.
//!
//! Events from the library and the binary go to stderr through
//! `tracing_subscriber::fmt`, filtered by `RUST_LOG` (default `info`). Stdout
//! is left to the console view.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .compact(),
        )
        .try_init()?;
    Ok(())
}
