//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber: `RUST_LOG` when set, otherwise
/// `restwire=info`, through the standard fmt layer.
///
/// Call once from a binary; library code never installs a subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restwire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
