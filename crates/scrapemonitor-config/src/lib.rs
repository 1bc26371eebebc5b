//! Shared configuration for the ScrapeMonitor process entry point.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults first, then
//! an optional TOML file (`SCRAPEMONITOR_CONFIG_PATH` or a discovered
//! `.scrapemonitor.toml`), then `SCRAPEMONITOR_*` environment variables.
//!
//! The process argument vector is not a configuration layer. Every argument
//! belongs to the bootstrapped daemon and is forwarded untouched, so
//! [`Config::load_ambient`] hands the loader nothing but the binary name.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};

mod defaults;
mod exit;
mod logging;

pub use defaults::{
    DEFAULT_ENTRY_POINT, DEFAULT_LOG_FILTER, default_entry_point, default_entry_point_string,
    default_failure_exit, default_log_filter, default_log_filter_string, default_log_format,
};
pub use exit::FailureExit;
pub use logging::LogFormat;

/// Name presented to the configuration loader in place of the real argv.
const LOADER_PROGRAM_NAME: &str = "scrapemonitor";

/// Runtime configuration for the bootstrap binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "SCRAPEMONITOR")]
pub struct Config {
    /// Fully-qualified name of the module started as the daemon.
    #[serde(default = "default_entry_point_string")]
    #[ortho_config(default = default_entry_point_string())]
    pub entry_point: String,
    /// Tracing filter expression applied to the process.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured logs.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Exit status used when the daemon could not be bootstrapped.
    #[serde(default = "default_failure_exit")]
    #[ortho_config(default = default_failure_exit())]
    pub failure_exit: FailureExit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_point: default_entry_point_string(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            failure_exit: default_failure_exit(),
        }
    }
}

impl Config {
    /// Loads configuration from defaults, files, and the environment only.
    ///
    /// # Errors
    ///
    /// Returns the aggregated [`OrthoError`] when a configuration file or an
    /// environment override cannot be parsed.
    pub fn load_ambient() -> Result<Self, Arc<OrthoError>> {
        Self::load_from_iter([OsString::from(LOADER_PROGRAM_NAME)])
    }

    /// Fully-qualified name of the daemon module.
    #[must_use]
    pub fn entry_point(&self) -> &str {
        self.entry_point.as_str()
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Structured log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Exit status policy for bootstrap failures.
    #[must_use]
    pub const fn failure_exit(&self) -> FailureExit {
        self.failure_exit
    }
}
