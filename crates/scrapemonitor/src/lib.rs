//! Process wiring for the ScrapeMonitor bootstrap binary.
//!
//! The binary owns everything around the bootstrap itself: loading
//! configuration from files and the environment, installing the `tracing`
//! subscriber, assembling the registry of linked modules, and turning the
//! bootstrap outcome into a process exit status. The bootstrap mechanism lives
//! in [`scrapemonitor_bootstrap`].

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

mod launch;
mod linkage;
mod telemetry;

pub use launch::{
    ConfigLoader, LaunchError, Launcher, ProcessOutcome, StaticConfigLoader, SystemConfigLoader,
    forwarded_arguments,
};
pub use linkage::{BOOTSTRAP_MODULE, linked_modules};
pub use telemetry::{TelemetryError, TelemetryHandle};

/// Runs the bootstrap binary with the raw process arguments.
///
/// Errors raised before the bootstrap starts (unreadable arguments, bad
/// configuration, telemetry set-up) are written to `stderr` because no log
/// sink exists yet; they always exit with status 1. Bootstrap failures are
/// logged by the bootstrap itself and exit according to the configured
/// failure-exit policy.
pub fn run<I, E>(args: I, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    E: Write,
{
    let result = forwarded_arguments(args).and_then(|argv| Launcher::system()?.launch(&argv));
    match result {
        Ok(outcome) => outcome.into(),
        Err(error) => {
            let _ = writeln!(stderr, "scrapemonitor: {error}");
            ExitCode::FAILURE
        }
    }
}
