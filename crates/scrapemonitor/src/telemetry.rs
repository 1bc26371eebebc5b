//! Log sink for the bootstrap failure record.
//!
//! The binary installs one process-wide `tracing` subscriber before the
//! bootstrap runs. `log_filter` governs everything the daemon logs, but error
//! records under [`BOOTSTRAP_TARGET`] always pass: a failed bootstrap must
//! leave its record on stderr whatever the operator filtered out.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::filter::{Directive, EnvFilter};
use tracing_subscriber::fmt::{self, MakeWriter, time::UtcTime};

use scrapemonitor_bootstrap::BOOTSTRAP_TARGET;
use scrapemonitor_config::{Config, LogFormat};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Proof that the process-wide subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors raised while installing the log sink.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another subscriber was installed first.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the stderr subscriber on first use.
///
/// Later calls return a handle without touching the installed subscriber.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            let subscriber = subscriber(config, io::stderr, io::stderr().is_terminal())?;
            tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
        })
        .map(|_| TelemetryHandle)
}

/// Builds the subscriber described by `config`, writing through `writer`.
pub(crate) fn subscriber<W>(
    config: &Config,
    writer: W,
    ansi: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter(config.log_filter())?)
        .with_target(true)
        .with_level(true)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    })
}

fn filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    let failure_records = format!("{BOOTSTRAP_TARGET}=error")
        .parse::<Directive>()
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;
    EnvFilter::try_new(expression)
        .map(|filter| filter.add_directive(failure_records))
        .map_err(|error| TelemetryError::Filter(error.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use rstest::rstest;
    use scrapemonitor_bootstrap::{
        BootstrapLoader, DaemonFailure, ModuleDefinition, ModuleName, ModuleRegistry,
        StructuredReporter,
    };

    use super::*;

    const DAEMON: &str = "edu.berkeley.scrapemonitor.ScrapeMonitorDaemon";

    #[derive(Debug, Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().expect("buffer mutex poisoned").clone();
            String::from_utf8(bytes)
                .expect("log output is utf-8")
                .lines()
                .map(str::to_owned)
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .expect("buffer mutex poisoned")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn config(filter: &str, format: LogFormat) -> Config {
        Config {
            log_filter: filter.to_owned(),
            log_format: format,
            ..Config::default()
        }
    }

    fn registry(linked: bool) -> Arc<ModuleRegistry> {
        let mut registry = ModuleRegistry::new();
        if linked {
            registry
                .register(ModuleDefinition::daemon(
                    ModuleName::parse(DAEMON).expect("valid name"),
                    || Ok(|_: &[String]| -> Result<(), DaemonFailure> { Ok(()) }),
                ))
                .expect("register daemon");
        }
        Arc::new(registry)
    }

    fn render(config: &Config, linked: bool) -> Vec<String> {
        let buffer = SharedBuffer::default();
        let sink = buffer.clone();
        let subscriber =
            subscriber(config, move || sink.clone(), false).expect("subscriber builds");
        let loader = BootstrapLoader::new(
            registry(linked),
            config.entry_point(),
            Arc::new(StructuredReporter::new()),
        );
        let outcome =
            tracing::subscriber::with_default(subscriber, || loader.run(&["--once".to_owned()]));
        assert_eq!(outcome.is_ok(), linked);
        buffer.lines()
    }

    #[rstest]
    #[case::default_filter("info")]
    #[case::daemon_silenced("off")]
    #[case::verbose("trace")]
    fn failed_bootstrap_renders_one_json_record(#[case] filter: &str) {
        let lines = render(&config(filter, LogFormat::Json), false);

        let [line] = lines.as_slice() else {
            panic!("expected exactly one record, got {lines:?}");
        };
        assert!(line.contains(r#""level":"ERROR""#), "{line}");
        assert!(line.contains(r#""event":"bootstrap_failed""#), "{line}");
        assert!(line.contains(r#""error_kind":"module_not_found""#), "{line}");
        assert!(line.contains(DAEMON), "{line}");
    }

    #[test]
    fn successful_bootstrap_renders_nothing() {
        let lines = render(&config("trace", LogFormat::Json), true);
        assert!(lines.is_empty(), "unexpected records: {lines:?}");
    }

    #[test]
    fn compact_format_renders_the_failure_on_one_line() {
        let lines = render(&config("info", LogFormat::Compact), false);

        let [line] = lines.as_slice() else {
            panic!("expected exactly one record, got {lines:?}");
        };
        assert!(line.contains("failed to start"), "{line}");
        assert!(line.contains(BOOTSTRAP_TARGET), "{line}");
    }

    #[test]
    fn malformed_filters_are_rejected() {
        let error = filter("scrapemonitor=loud").expect_err("invalid level");
        assert!(matches!(error, TelemetryError::Filter(_)));
    }
}
