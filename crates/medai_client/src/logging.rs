//! Tracing setup shared by the binaries. Filter comes from `RUST_LOG` (default `warn`);
//! output goes to stderr so stdout stays clean for answers.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
