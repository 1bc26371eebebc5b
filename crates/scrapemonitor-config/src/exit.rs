//! Exit status policy applied when the daemon cannot be bootstrapped.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Process exit status reported after a failed bootstrap attempt.
///
/// A successful bootstrap always exits cleanly. `Success` keeps the process
/// status clean even when the daemon never started, leaving diagnosis to the
/// log stream and whatever supervises the process.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FailureExit {
    /// Exit with status 1.
    #[default]
    Failure,
    /// Exit with status 0.
    Success,
}

impl FailureExit {
    /// Numeric process status for this policy.
    #[must_use]
    pub const fn status(self) -> u8 {
        match self {
            Self::Failure => 1,
            Self::Success => 0,
        }
    }
}
