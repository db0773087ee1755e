use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Installs the global structured-logging subscriber.
/// `RUST_LOG` wins when set; otherwise the crate logs at `config.rust_log`.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow!("tracing subscriber already installed: {e}"))
}
