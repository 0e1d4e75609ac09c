// Tracing setup for host applications
//
// The poller itself only emits `tracing` events; hosts that already run a
// subscriber can ignore this module.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize a fmt subscriber filtered by `RUST_LOG`, defaulting to
/// info-level events from this crate.
///
/// Call at most once per process.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("query_autorefresh=info".parse()?))
        .try_init()?;
    Ok(())
}
