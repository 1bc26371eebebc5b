//! Crate-level test doubles and behaviour suites.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::entry::{DaemonEntryPoint, DaemonFailure, DaemonMessage};
use crate::error::BootstrapError;
use crate::module::{LoadError, ModuleDefinition, ModuleName};
use crate::registry::ModuleRegistry;
use crate::reporter::BootstrapReporter;


pub(crate) const DAEMON_NAME: &str = "edu.berkeley.scrapemonitor.ScrapeMonitorDaemon";

/// Reporter events captured for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReportedEvent {
    Starting(String),
    Completed(String),
    Failed {
        kind: &'static str,
        message: String,
        error_type: Option<&'static str>,
        causes: Vec<String>,
    },
}

/// Records reporter calls in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    events: Mutex<Vec<ReportedEvent>>,
}

impl RecordingReporter {
    pub(crate) fn events(&self) -> Vec<ReportedEvent> {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .clone()
    }

    pub(crate) fn failures(&self) -> Vec<ReportedEvent> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, ReportedEvent::Failed { .. }))
            .collect()
    }

    fn record(&self, event: ReportedEvent) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(event);
    }
}

impl BootstrapReporter for RecordingReporter {
    fn bootstrap_starting(&self, target: &str) {
        self.record(ReportedEvent::Starting(target.to_owned()));
    }

    fn bootstrap_completed(&self, module: &ModuleName) {
        self.record(ReportedEvent::Completed(module.to_string()));
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(ReportedEvent::Failed {
            kind: error.kind(),
            message: error.to_string(),
            error_type: error.error_type(),
            causes: error.cause_chain(),
        });
    }
}

/// Behaviour of a [`RecordingDaemon`]'s entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DaemonBehaviour {
    #[default]
    Return,
    Fail,
    Panic,
}

/// Daemon double that records every argument vector it receives and counts
/// how often its factory runs.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingDaemon {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    builds: Arc<AtomicUsize>,
    behaviour: DaemonBehaviour,
}

impl RecordingDaemon {
    pub(crate) fn with_behaviour(behaviour: DaemonBehaviour) -> Self {
        Self {
            behaviour,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("daemon mutex poisoned").clone()
    }

    pub(crate) fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub(crate) fn definition(&self, name: &str) -> ModuleDefinition {
        let template = self.clone();
        ModuleDefinition::daemon(module_name(name), move || -> Result<Self, LoadError> {
            template.builds.fetch_add(1, Ordering::SeqCst);
            Ok(template.clone())
        })
    }
}

impl DaemonEntryPoint for RecordingDaemon {
    fn main(&self, args: &[String]) -> Result<(), DaemonFailure> {
        self.calls
            .lock()
            .expect("daemon mutex poisoned")
            .push(args.to_vec());
        match self.behaviour {
            DaemonBehaviour::Return => Ok(()),
            DaemonBehaviour::Fail => Err(DaemonFailure::new(DaemonMessage(
                "scrape target list is empty".into(),
            ))),
            DaemonBehaviour::Panic => panic!("scheduler thread died"),
        }
    }
}

pub(crate) fn module_name(raw: &str) -> ModuleName {
    ModuleName::parse(raw).expect("valid module name")
}

pub(crate) fn registry_with(definitions: Vec<ModuleDefinition>) -> Arc<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    for definition in definitions {
        registry.register(definition).expect("register module");
    }
    Arc::new(registry)
}

pub(crate) fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}
