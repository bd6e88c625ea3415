//! Logging and tracing infrastructure for corewalk.
//!
//! Structured logging via the tracing crate, with env-based filtering.

use std::sync::Once;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// This should be called once at program startup.
/// Subsequent calls are ignored.
pub fn init_tracing() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let fmt_layer = fmt::layer().with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
    });
}
