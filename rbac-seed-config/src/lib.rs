//! Shared configuration library for rbac-seed.
//!
//! Resolves the seeding worker count from the environment, `.env` and
//! optional settings files, and installs the `tracing` subscriber used by the
//! host process.

pub mod error;
pub mod settings;
pub mod telemetry;

pub use error::ConfigError;
pub use settings::{
    FileSeedSettings, MAX_SEED_THREADS_VAR, SEED_CONFIG_PATH_VAR,
    SeedSettings, SeedSettingsLoad, SeedSettingsLoader, SeedSettingsSource,
    load_dotenv, parse_max_seed_threads,
};
pub use telemetry::{DEFAULT_LOG_FILTER, init_tracing};

use tracing::info;

/// Loads `.env`, resolves [`SeedSettings`] from the process environment and
/// logs where the worker count came from.
pub fn load_seed_settings() -> Result<SeedSettings, ConfigError> {
    let (loader, env_file_loaded) = SeedSettingsLoader::from_process_env()?;
    let SeedSettingsLoad { settings, source } = loader.load()?;

    if env_file_loaded {
        info!("loaded .env file");
    }

    match &source {
        SeedSettingsSource::Default => {
            info!(max_seed_threads = settings.max_seed_threads, "seed settings defaulted")
        }
        SeedSettingsSource::Env => {
            info!(max_seed_threads = settings.max_seed_threads, "seed settings loaded from environment")
        }
        SeedSettingsSource::EnvPath(path) | SeedSettingsSource::File(path) => {
            info!(
                path = %path.display(),
                max_seed_threads = settings.max_seed_threads,
                "seed settings loaded from file"
            )
        }
    }

    Ok(settings)
}
