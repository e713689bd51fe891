//! Logging setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the tracing subscriber for the whole run.
///
/// `RUST_LOG` wins over the passed default level when set. Module targets
/// are suppressed in the output; the tool is small enough that the message
/// text locates the stage.
pub fn setup_logging(default_level: &str) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| crate::Error::Config(format!("invalid log filter '{}': {}", default_level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    Ok(())
}
