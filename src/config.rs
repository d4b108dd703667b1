//! Runtime settings.
//!
//! Settings are layered, later layers winning: built-in defaults, an
//! optional config file, `PFMATRIX_*` environment variables, then
//! command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::data::Direction;

/// Prefix for environment overrides, e.g. `PFMATRIX_SOURCE_URL`.
pub const ENV_PREFIX: &str = "PFMATRIX";

pub const DEFAULT_SOURCE_URL: &str = "http://soichi6.grid.iu.edu/myosg/vopfmatrix/matrix?id=627";
pub const DEFAULT_HEADER_NAME: &str = "Host";
pub const DEFAULT_REFRESH_SECS: i64 = 60;
pub const DEFAULT_TIMEOUT_SECS: i64 = 10;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Endpoint serving the matrix JSON.
    pub source_url: String,
    /// Read the matrix from this file instead of `source_url`.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Label of the row-header column.
    pub header_name: String,
    /// Seconds between fetches.
    pub refresh_secs: u64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Which measurement of each slot to show.
    pub direction: Direction,
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source_url: Option<String>,
    pub file: Option<PathBuf>,
    pub header_name: Option<String>,
    pub refresh_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub direction: Option<Direction>,
}

impl Settings {
    /// Load settings from every layer, reading the process environment.
    pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::load_with_env(config_file, Environment::with_prefix(ENV_PREFIX), overrides)
    }

    /// Load settings with an explicit environment layer.
    pub fn load_with_env(
        config_file: Option<&Path>,
        environment: Environment,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("source_url", DEFAULT_SOURCE_URL)?
            .set_default("header_name", DEFAULT_HEADER_NAME)?
            .set_default("refresh_secs", DEFAULT_REFRESH_SECS)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("direction", Direction::default().label())?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(environment)
            .set_override_option("source_url", overrides.source_url.clone())?
            .set_override_option("file", overrides.file.as_ref().map(|p| p.display().to_string()))?
            .set_override_option("header_name", overrides.header_name.clone())?
            .set_override_option("refresh_secs", overrides.refresh_secs.map(clamp_secs))?
            .set_override_option("timeout_secs", overrides.timeout_secs.map(clamp_secs))?
            .set_override_option("direction", overrides.direction.map(|d| d.label()))?
            .build()?
            .try_deserialize()
    }

    /// Interval between fetches, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn clamp_secs(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}
