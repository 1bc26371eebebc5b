use crate::exit::FailureExit;
use crate::logging::LogFormat;

/// Module bootstrapped when no override is configured.
pub const DEFAULT_ENTRY_POINT: &str = "edu.berkeley.scrapemonitor.ScrapeMonitorDaemon";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default daemon module name.
#[must_use]
pub const fn default_entry_point() -> &'static str {
    DEFAULT_ENTRY_POINT
}

/// Owned daemon module name used where allocation is required (e.g. serde).
#[must_use]
pub fn default_entry_point_string() -> String {
    DEFAULT_ENTRY_POINT.to_owned()
}

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Bootstrap failures terminate the process with a failing status by default.
#[must_use]
pub const fn default_failure_exit() -> FailureExit {
    FailureExit::Failure
}
