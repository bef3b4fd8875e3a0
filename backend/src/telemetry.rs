//! Telemetry initialization: tracing subscriber with an `EnvFilter`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "galleria_backend=debug,tower_http=debug,sqlx::query=info";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Calling this twice is a no-op for
/// the second call.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
