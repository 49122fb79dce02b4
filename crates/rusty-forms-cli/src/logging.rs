use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr so stdout stays machine-readable
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("Invalid log level '{}'", level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
