//! Where the operator writes its logs.
//!
//! Every enabled target gets its own `tracing` layer; the level filter applies
//! to all of them.
use std::{fs::OpenOptions, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use tracing_subscriber::{
    Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

/// The `log` section of the operator configuration.
///
/// Inside a pod the container runtime collects standard output, so that is the
/// only target enabled by default.
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    /// Appends plain text logs to this file, without colors.
    #[serde(default = "LogConfig::default_file_path")]
    pub file_path: Option<PathBuf>,

    /// For operators running on a host with systemd.
    #[serde(default = "LogConfig::default_emit_journald")]
    pub emit_journald: bool,

    #[serde(default = "LogConfig::default_emit_stdout")]
    pub emit_stdout: bool,

    #[serde(default = "LogConfig::default_emit_stderr")]
    pub emit_stderr: bool,

    /// Written as `info`, `debug`, ...; overridden by `--log-level`.
    #[serde(default = "LogConfig::default_log_level")]
    #[serde_as(as = "DisplayFromStr")]
    pub level: tracing::Level,
}

impl Default for LogConfig {
    /// ```rust
    /// use fresh_container_cli::config::LogConfig;
    ///
    /// let log = LogConfig::default();
    /// assert_eq!(log.level, tracing::Level::INFO);
    /// assert!(log.emit_stdout);
    /// assert!(!log.emit_stderr && !log.emit_journald && log.file_path.is_none());
    /// ```
    fn default() -> Self {
        Self {
            file_path: Self::default_file_path(),
            emit_journald: Self::default_emit_journald(),
            emit_stdout: Self::default_emit_stdout(),
            emit_stderr: Self::default_emit_stderr(),
            level: Self::default_log_level(),
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub const fn default_log_level() -> tracing::Level { tracing::Level::INFO }

    #[inline]
    #[must_use]
    pub const fn default_file_path() -> Option<PathBuf> { None }

    #[inline]
    #[must_use]
    pub const fn default_emit_journald() -> bool { false }

    #[inline]
    #[must_use]
    pub const fn default_emit_stdout() -> bool { true }

    #[inline]
    #[must_use]
    pub const fn default_emit_stderr() -> bool { false }

    /// Installs the global subscriber. Events recorded before this call are
    /// lost.
    ///
    /// # Panics
    ///
    /// Panics when a global subscriber is already installed.
    pub fn registry(&self) {
        let Self { emit_journald, file_path, emit_stdout, emit_stderr, level: log_level } = self;

        let filter_layer = tracing_subscriber::filter::LevelFilter::from_level(*log_level);

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(emit_journald.then(|| LogDriver::Journald.layer()))
            .with(file_path.clone().map(|path| LogDriver::File(path).layer()))
            .with(emit_stdout.then(|| LogDriver::Stdout.layer()))
            .with(emit_stderr.then(|| LogDriver::Stderr.layer()))
            .init();
    }
}

#[derive(Clone, Debug)]
enum LogDriver {
    Stdout,
    Stderr,
    Journald,
    File(PathBuf),
}

impl LogDriver {
    /// `None` when the file cannot be opened or `journald` is unreachable;
    /// the remaining targets still receive events.
    #[allow(clippy::type_repetition_in_bounds)]
    fn layer<S>(self) -> Option<Box<dyn Layer<S> + Send + Sync + 'static>>
    where
        S: tracing::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt = tracing_subscriber::fmt::layer().with_target(true).with_thread_ids(true);

        match self {
            Self::Stdout => Some(Box::new(fmt.with_writer(std::io::stdout))),
            Self::Stderr => Some(Box::new(fmt.with_writer(std::io::stderr))),
            Self::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
                Some(Box::new(fmt.with_ansi(false).with_writer(file)))
            }
            Self::Journald => Some(Box::new(tracing_journald::layer().ok()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_config() {
        let config: LogConfig =
            serde_yaml::from_str("level: debug\nemitStderr: true\n").expect("valid log config");
        assert_eq!(config.level, tracing::Level::DEBUG);
        assert!(config.emit_stderr);
        assert!(config.emit_stdout);
        assert!(!config.emit_journald);
    }

    #[test]
    fn test_reject_unknown_level() {
        let result = serde_yaml::from_str::<LogConfig>("level: chatty\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unwritable_log_file_is_skipped() {
        let dir = std::env::temp_dir();
        assert!(LogDriver::File(dir).layer::<tracing_subscriber::Registry>().is_none());
        assert!(LogDriver::Stdout.layer::<tracing_subscriber::Registry>().is_some());
    }
}
