// ABOUTME: Tracing subscriber setup for the application and tests.
// ABOUTME: Filter comes from RUST_LOG, falling back to info for this crate.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "airops=info,airops_lib=info";

/// Installs a global fmt subscriber. Safe to call more than once.
pub fn init() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
