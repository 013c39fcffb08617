//! Runtime settings read from the environment (and an optional `.env` file).

use std::{env, error::Error as StdError, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};

const SEED_VAR: &str = "SWACHHGRID_SEED";
const DEMO_DATA_VAR: &str = "SWACHHGRID_DEMO_DATA";
const LOG_FILE_VAR: &str = "SWACHHGRID_LOG_FILE";
const LOG_FILTER_VAR: &str = "RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    /// Seed for fill-level estimates and demo data.
    pub seed: u64,
    /// Populate the store with demo bins on start.
    pub demo_data: bool,
    /// Where tracing output goes; logging is off without it.
    pub log_file: Option<PathBuf>,
    /// `tracing` filter directives, e.g. `info` or `swachhgrid_core=debug`.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 42,
            demo_data: true,
            log_file: None,
            log_filter: "info".to_owned(),
        }
    }
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        // A missing .env file is the normal case.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            seed: parse_var(&lookup, SEED_VAR)?.unwrap_or(defaults.seed),
            demo_data: parse_var(&lookup, DEMO_DATA_VAR)?.unwrap_or(defaults.demo_data),
            log_file: lookup(LOG_FILE_VAR)
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            log_filter: lookup(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value {raw:?} for {key}"))
        })
        .transpose()
}
