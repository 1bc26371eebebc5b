//! Log output format for the bootstrap's telemetry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How bootstrap records are rendered on stderr.
///
/// Set through `log_format` in the configuration file or
/// `SCRAPEMONITOR_LOG_FORMAT`; matching is case-insensitive.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per record, fields flattened to the top level so a
    /// supervisor can pick out `event` and `error_kind` directly.
    #[default]
    Json,
    /// Single-line text for an operator watching a terminal.
    Compact,
}
