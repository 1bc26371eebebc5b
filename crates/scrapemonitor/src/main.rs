//! Process entry point for the ScrapeMonitor daemon.
//!
//! Delegates to [`scrapemonitor::run`], which loads configuration, installs
//! telemetry, and bootstraps the configured daemon module with every argument
//! after the program name.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stderr = io::stderr().lock();
    scrapemonitor::run(std::env::args_os(), &mut stderr)
}
