use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, or by the configured
/// level when that is unset. Returns false if a subscriber was already set.
pub fn init(settings: &Settings) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
