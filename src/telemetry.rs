//! Telemetry
//!
//! Sets up `tracing-subscriber` for structured logging. Output goes to
//! stderr so stdout stays free for conversation replies.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;

/// Installs the global subscriber.
///
/// Priority: `RUST_LOG` env var > configured `log_level`. Installing twice
/// is a no-op.
pub fn init_telemetry(config: &TelemetryConfig) {
    let level = config.log_level.to_ascii_lowercase();
    let default_filter = format!("{},trip_concierge={}", level, level);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty().with_target(false).with_writer(std::io::stderr))
            .try_init()
            .ok();
    }
}
