mod error;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use fresh_container_cli::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::error::Error;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Seconds before a monitor is reconciled again after a pass.
    #[serde(default = "default_requeue_interval_seconds")]
    pub requeue_interval_seconds: u64,

    /// Seconds before a failed pass is retried.
    #[serde(default = "default_error_requeue_interval_seconds")]
    pub error_requeue_interval_seconds: u64,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            requeue_interval_seconds: default_requeue_interval_seconds(),
            error_requeue_interval_seconds: default_error_requeue_interval_seconds(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn search_config_file_path() -> PathBuf {
        let paths = vec![Self::default_path()]
            .into_iter()
            .chain(fresh_container_base::fallback_project_config_directories().into_iter().map(
                |mut path| {
                    path.push(fresh_container_base::CLI_CONFIG_NAME);
                    path
                },
            ))
            .collect::<Vec<_>>();
        for path in paths {
            let Ok(exists) = path.try_exists() else {
                continue;
            };
            if exists {
                return path;
            }
        }
        Self::default_path()
    }

    #[inline]
    pub fn default_path() -> PathBuf {
        [
            fresh_container_base::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(fresh_container_base::CLI_CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    /// Loads the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid configuration.
    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut config: Self = {
            let path =
                path.as_ref().try_resolve().map(|path| path.to_path_buf()).with_context(|_| {
                    error::ResolveFilePathSnafu { file_path: path.as_ref().to_path_buf() }
                })?;
            let data =
                std::fs::read(&path).context(error::OpenConfigSnafu { filename: path.clone() })?;
            serde_yaml::from_slice(&data).context(error::ParseConfigSnafu { filename: path })?
        };

        config.log.file_path = match config.log.file_path.map(|path| {
            path.try_resolve()
                .map(|path| path.to_path_buf())
                .with_context(|_| error::ResolveFilePathSnafu { file_path: path.clone() })
        }) {
            Some(Ok(path)) => Some(path),
            Some(Err(err)) => return Err(err),
            None => None,
        };

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields `None`.
    ///
    /// # Errors
    ///
    /// Fails when an existing file cannot be read or parsed.
    pub fn load_if_exists<P: AsRef<Path>>(path: P) -> Result<Option<Self>, Error> {
        match path.as_ref().try_exists() {
            Ok(false) => Ok(None),
            _ => Self::load(path).map(Some),
        }
    }

    /// The default configuration rendered as YAML.
    pub fn template_basic() -> Vec<u8> {
        serde_yaml::to_string(&Self::default()).unwrap_or_default().into_bytes()
    }

    #[must_use]
    pub const fn requeue_interval(&self) -> Duration {
        Duration::from_secs(self.requeue_interval_seconds)
    }

    #[must_use]
    pub const fn error_requeue_interval(&self) -> Duration {
        Duration::from_secs(self.error_requeue_interval_seconds)
    }
}

const fn default_requeue_interval_seconds() -> u64 { 30 }

const fn default_error_requeue_interval_seconds() -> u64 { 5 }
