use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber and the color-eyre report handler.
///
/// `RUST_LOG` overrides the default `info` filter. Call once at startup.
pub fn init_tracing() -> Result<()> {
    color_eyre::install()?;

    let fmt_layer = fmt::layer().compact();
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

/// Test-friendly subscriber: writes through the test harness and tolerates
/// being called more than once.
pub fn try_init_test_tracing() {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_default();

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().compact().with_test_writer())
        .with(ErrorLayer::default())
        .try_init();
}
