//! livescope: live plots of two WebSocket value streams.
//!
//! Run with:  `RUST_LOG=info livescope`

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging. RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("livescope v{} starting", env!("CARGO_PKG_VERSION"));

    let config = scope_config::load(scope_config::default_path())?;

    // Ingestion workers live on their own runtime, independent of the UI loop.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("livescope-io")
        .build()
        .context("cannot start async runtime")?;

    if config.global.headless {
        runtime.block_on(scope_app::run_headless(config))?;
        return Ok(());
    }

    scope_app::run(config, runtime.handle().clone()).map_err(Into::into)
}
