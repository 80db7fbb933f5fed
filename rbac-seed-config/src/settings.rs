use anyhow::{Context, anyhow};
use rbac_seed_core::orchestration::{
    MAX_WORKERS_LIMIT, SeedConfig, default_max_workers,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

pub const MAX_SEED_THREADS_VAR: &str = "MAX_SEED_THREADS";
pub const SEED_CONFIG_PATH_VAR: &str = "SEED_CONFIG_PATH";

const DEFAULT_FILE_CANDIDATES: &[&str] = &[
    "seed.toml",
    "seed.json",
    "config/seed.toml",
    "config/seed.json",
];

/// Where the effective worker count came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeedSettingsSource {
    #[default]
    Default,
    /// `MAX_SEED_THREADS` in the environment (or `.env`).
    Env,
    /// File named by `SEED_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// One of the default file locations.
    File(PathBuf),
}

/// Settings for the startup seeding passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSettings {
    /// Maximum tenants seeded concurrently.
    pub max_seed_threads: usize,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            max_seed_threads: default_max_workers(),
        }
    }
}

impl SeedSettings {
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig::with_max_workers(self.max_seed_threads)
    }
}

impl From<SeedSettings> for SeedConfig {
    fn from(settings: SeedSettings) -> Self {
        settings.seed_config()
    }
}

/// Raw settings as written in a TOML or JSON file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileSeedSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_seed_threads: Option<i64>,
}

impl FileSeedSettings {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read seed settings from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)
                .map_err(|err| anyhow!("invalid seed settings json: {err}")),
            Some("toml") => toml::from_str(&contents)
                .map_err(|err| anyhow!("invalid seed settings toml: {err}")),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // Try TOML first, then JSON.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse seed settings {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }
}

/// Result of [`SeedSettingsLoader::load`].
#[derive(Debug, Clone)]
pub struct SeedSettingsLoad {
    pub settings: SeedSettings,
    pub source: SeedSettingsSource,
}

/// Resolves [`SeedSettings`].
///
/// Evaluation order for the worker count:
/// 1) `$MAX_SEED_THREADS`,
/// 2) `max_seed_threads` in the file named by `$SEED_CONFIG_PATH`,
/// 3) `max_seed_threads` in `seed.toml` / `seed.json` (also under `config/`),
/// 4) the default.
pub struct SeedSettingsLoader<F> {
    env: F,
    base_dir: PathBuf,
}

impl<F> std::fmt::Debug for SeedSettingsLoader<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedSettingsLoader")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl SeedSettingsLoader<fn(&str) -> Option<String>> {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_process_env() -> Result<(Self, bool), ConfigError> {
        let env_file_loaded = load_dotenv()?;
        let env: fn(&str) -> Option<String> = process_env;
        Ok((Self::with_env(env), env_file_loaded))
    }
}

impl<F> SeedSettingsLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn with_env(env: F) -> Self {
        Self {
            env,
            base_dir: PathBuf::from("."),
        }
    }

    /// Directory the default file candidates are resolved against.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn load(&self) -> Result<SeedSettingsLoad, ConfigError> {
        if let Some(raw) = self.var(MAX_SEED_THREADS_VAR) {
            let max_seed_threads = parse_max_seed_threads(&raw)?;
            return Ok(SeedSettingsLoad {
                settings: SeedSettings { max_seed_threads },
                source: SeedSettingsSource::Env,
            });
        }

        if let Some(path) = self.var(SEED_CONFIG_PATH_VAR).map(PathBuf::from)
            && let Some(max_seed_threads) = read_file_value(&path)?
        {
            return Ok(SeedSettingsLoad {
                settings: SeedSettings { max_seed_threads },
                source: SeedSettingsSource::EnvPath(path),
            });
        }

        if let Some(path) = self.find_default_file()
            && let Some(max_seed_threads) = read_file_value(&path)?
        {
            return Ok(SeedSettingsLoad {
                settings: SeedSettings { max_seed_threads },
                source: SeedSettingsSource::File(path),
            });
        }

        Ok(SeedSettingsLoad {
            settings: SeedSettings::default(),
            source: SeedSettingsSource::Default,
        })
    }

    /// Blank values count as unset.
    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_FILE_CANDIDATES
            .iter()
            .map(|candidate| self.base_dir.join(candidate))
            .find(|path| path.exists())
    }
}

/// Loads `.env` into the process environment. A missing file is not an
/// error; returns whether one was loaded.
pub fn load_dotenv() -> Result<bool, ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(true),
        Err(err) if err.not_found() => Ok(false),
        Err(err) => Err(err.into()),
    }
}

/// Accepts integers in `1..=MAX_WORKERS_LIMIT`.
pub fn parse_max_seed_threads(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(value) if (1..=MAX_WORKERS_LIMIT).contains(&value) => Ok(value),
        _ => Err(ConfigError::InvalidMaxSeedThreads {
            value: raw.to_string(),
        }),
    }
}

fn read_file_value(path: &Path) -> Result<Option<usize>, ConfigError> {
    let file = FileSeedSettings::load_from_file(path).map_err(|source| {
        ConfigError::File {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let Some(value) = file.max_seed_threads else {
        return Ok(None);
    };

    usize::try_from(value)
        .ok()
        .filter(|threads| (1..=MAX_WORKERS_LIMIT).contains(threads))
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidMaxSeedThreads {
            value: value.to_string(),
        })
}
