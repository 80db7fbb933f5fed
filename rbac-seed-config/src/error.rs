use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MAX_SEED_THREADS must be a positive integer within the worker pool limit, got '{value}'")]
    InvalidMaxSeedThreads { value: String },
    #[error("failed to load seed settings from {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
