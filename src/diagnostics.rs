//! Diagnostics: tracing setup plus the shared error message prefix.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const ERROR_PREFIX: &str = "protocol-builder";

/// Install the stderr subscriber. `RUST_LOG` wins over the default level.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Format an error line with the crate prefix.
pub fn error_message(msg: impl AsRef<str>) -> String {
    format!("{}: {}", ERROR_PREFIX, msg.as_ref())
}
