//! Structured reporting for bootstrap attempts.

use std::sync::Arc;

use crate::error::BootstrapError;
use crate::module::ModuleName;

/// `tracing` target under which bootstrap events are recorded.
pub const BOOTSTRAP_TARGET: &str = "scrapemonitor::bootstrap";

/// Observer notified as a bootstrap attempt progresses.
///
/// Only [`BootstrapReporter::bootstrap_failed`] is required. A failed attempt
/// calls it exactly once; a successful attempt never does.
pub trait BootstrapReporter: Send + Sync {
    /// Invoked before the target module is resolved.
    fn bootstrap_starting(&self, _target: &str) {}

    /// Invoked after the daemon's entry point returns successfully.
    fn bootstrap_completed(&self, _module: &ModuleName) {}

    /// Invoked when the attempt fails at any step.
    fn bootstrap_failed(&self, error: &BootstrapError);
}

impl<T> BootstrapReporter for Arc<T>
where
    T: BootstrapReporter + ?Sized,
{
    fn bootstrap_starting(&self, target: &str) {
        (**self).bootstrap_starting(target);
    }

    fn bootstrap_completed(&self, module: &ModuleName) {
        (**self).bootstrap_completed(module);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }
}

/// Default reporter that records bootstrap failures using `tracing`.
///
/// A successful attempt logs nothing. A failure is a single error event under
/// [`BOOTSTRAP_TARGET`] carrying the message, the failure kind, the daemon's
/// own error type when known, the root cause, and the full cause chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredReporter;

impl StructuredReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl BootstrapReporter for StructuredReporter {
    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: BOOTSTRAP_TARGET,
            event = "bootstrap_failed",
            module = %error.module(),
            error = %error,
            error_kind = error.kind(),
            error_type = error.error_type(),
            root_cause = %error.root_cause(),
            causes = ?error.cause_chain(),
            "failed to start"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fmt;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::loader::BootstrapLoader;
    use crate::tests::{DAEMON_NAME, DaemonBehaviour, RecordingDaemon, args, registry_with};

    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: Level,
        target: String,
        fields: BTreeMap<String, String>,
    }

    impl CapturedEvent {
        fn field(&self, name: &str) -> &str {
            self.fields.get(name).map_or("", String::as_str)
        }
    }

    #[derive(Debug, Clone, Default)]
    struct EventCapture(Arc<Mutex<Vec<CapturedEvent>>>);

    impl EventCapture {
        fn events(&self) -> Vec<CapturedEvent> {
            self.0.lock().expect("capture mutex poisoned").clone()
        }
    }

    impl<S: Subscriber> Layer<S> for EventCapture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = FieldMap::default();
            event.record(&mut fields);
            self.0
                .lock()
                .expect("capture mutex poisoned")
                .push(CapturedEvent {
                    level: *event.metadata().level(),
                    target: event.metadata().target().to_owned(),
                    fields: fields.0,
                });
        }
    }

    #[derive(Default)]
    struct FieldMap(BTreeMap<String, String>);

    impl Visit for FieldMap {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

    fn capture_run(daemon: &RecordingDaemon, target: &str) -> Vec<CapturedEvent> {
        let capture = EventCapture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let loader = BootstrapLoader::new(
            registry_with(vec![daemon.definition(DAEMON_NAME)]),
            target,
            Arc::new(StructuredReporter::new()),
        );
        let _ = tracing::subscriber::with_default(subscriber, || loader.run(&args(&["--once"])));
        capture.events()
    }

    #[test]
    fn successful_bootstrap_logs_nothing() {
        let events = capture_run(&RecordingDaemon::default(), DAEMON_NAME);
        assert!(events.is_empty(), "unexpected records: {events:?}");
    }

    #[test]
    fn daemon_error_is_one_record_naming_its_type() {
        let daemon = RecordingDaemon::with_behaviour(DaemonBehaviour::Fail);
        let events = capture_run(&daemon, DAEMON_NAME);

        let [event] = events.as_slice() else {
            panic!("expected exactly one record, got {events:?}");
        };
        assert_eq!(event.level, Level::ERROR);
        assert_eq!(event.target, BOOTSTRAP_TARGET);
        assert_eq!(event.field("event"), "bootstrap_failed");
        assert_eq!(event.field("module"), DAEMON_NAME);
        assert_eq!(event.field("error_kind"), "invocation_failed");
        assert!(
            event.field("error_type").ends_with("DaemonMessage"),
            "unexpected error type: {}",
            event.field("error_type")
        );
        assert_eq!(event.field("root_cause"), "scrape target list is empty");
        assert!(
            event.field("error").contains("scrape target list is empty"),
            "unexpected error: {}",
            event.field("error")
        );
        assert!(
            event.field("causes").contains("scrape target list is empty"),
            "unexpected causes: {}",
            event.field("causes")
        );
        assert_eq!(event.field("message"), "failed to start");
    }

    #[test]
    fn resolution_failures_carry_no_error_type() {
        let events = capture_run(&RecordingDaemon::default(), "org.example.Missing");

        let [event] = events.as_slice() else {
            panic!("expected exactly one record, got {events:?}");
        };
        assert_eq!(event.field("error_kind"), "module_not_found");
        assert!(!event.fields.contains_key("error_type"));
    }
}
