use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
    util::TryInitError,
};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,rbac_seed_core=info";

/// Installs the global `tracing` subscriber: an `EnvFilter` from `RUST_LOG`
/// (falling back to `default_filter`) in front of the fmt layer.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
