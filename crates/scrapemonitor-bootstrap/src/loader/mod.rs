//! The bootstrap failure boundary.
//!
//! [`BootstrapLoader::run`] turns a process invocation into a call into the
//! configured daemon module. Each call is an independent attempt: the target
//! name is validated, a fresh [`ResolutionContext`] is built over the loader's
//! registry, the module is resolved and instantiated, and its entry point is
//! invoked with the argument vector. Errors and panics from any step end the
//! attempt, are reported once, and are returned to the caller.
//!
//! While the entry point runs, the panic hook is silenced for the bootstrap
//! thread so an escaping panic yields only the reported failure, never the
//! default `thread 'main' panicked` text. Other threads keep the previous
//! hook.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::context::ResolutionContext;
use crate::entry::DaemonEntryPoint;
use crate::error::BootstrapError;
use crate::module::{ModuleDefinition, ModuleName};
use crate::registry::ModuleRegistry;
use crate::reporter::BootstrapReporter;

/// Resolves and starts the daemon module named by the configuration.
pub struct BootstrapLoader {
    parent: Arc<ModuleRegistry>,
    target: String,
    local: Vec<ModuleDefinition>,
    reporter: Arc<dyn BootstrapReporter>,
}

impl BootstrapLoader {
    /// Creates a loader that resolves `target` against `parent`.
    ///
    /// The target is validated on every attempt rather than here, so a bad
    /// name is reported through the same channel as every other failure.
    #[must_use]
    pub fn new(
        parent: Arc<ModuleRegistry>,
        target: impl Into<String>,
        reporter: Arc<dyn BootstrapReporter>,
    ) -> Self {
        Self {
            parent,
            target: target.into(),
            local: Vec::new(),
            reporter,
        }
    }

    /// Adds modules defined into each attempt's resolution context.
    #[must_use]
    pub fn with_local_modules(mut self, modules: Vec<ModuleDefinition>) -> Self {
        self.local = modules;
        self
    }

    /// Name of the module this loader starts.
    #[must_use]
    pub fn target(&self) -> &str {
        self.target.as_str()
    }

    /// Registry every attempt is parented to.
    #[must_use]
    pub fn parent(&self) -> &ModuleRegistry {
        &self.parent
    }

    /// Runs one bootstrap attempt, forwarding `args` to the daemon unchanged.
    ///
    /// Returns once the daemon's entry point returns. Nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns the [`BootstrapError`] that ended the attempt after reporting it
    /// through [`BootstrapReporter::bootstrap_failed`].
    pub fn run(&self, args: &[String]) -> Result<(), BootstrapError> {
        self.reporter.bootstrap_starting(&self.target);
        match self.attempt(args) {
            Ok(module) => {
                self.reporter.bootstrap_completed(&module);
                Ok(())
            }
            Err(error) => {
                self.reporter.bootstrap_failed(&error);
                Err(error)
            }
        }
    }

    fn attempt(&self, args: &[String]) -> Result<ModuleName, BootstrapError> {
        let name =
            ModuleName::parse(&self.target).map_err(|source| BootstrapError::InvalidModuleName {
                name: self.target.clone(),
                source,
            })?;

        let mut context = ResolutionContext::new(&self.parent);
        for definition in &self.local {
            context.define(definition.clone())?;
        }

        let entry = context.resolve(&name)?.instantiate()?;
        invoke(&name, entry.as_ref(), args)?;
        Ok(name)
    }
}

impl std::fmt::Debug for BootstrapLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapLoader")
            .field("target", &self.target)
            .field("parent", &self.parent.names())
            .field("local", &self.local.len())
            .finish_non_exhaustive()
    }
}

type PanicHook = Arc<dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static>;

fn invoke(
    module: &ModuleName,
    entry: &dyn DaemonEntryPoint,
    args: &[String],
) -> Result<(), BootstrapError> {
    let location = Arc::new(Mutex::new(None));
    let previous = silence_panic_hook(Arc::clone(&location));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.main(args)));
    restore_panic_hook(previous);

    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(failure)) => Err(BootstrapError::invocation(module, failure)),
        Err(payload) => Err(BootstrapError::Panicked {
            module: module.to_string(),
            location: location
                .lock()
                .ok()
                .and_then(|mut slot| slot.take())
                .unwrap_or_else(|| String::from("unknown location")),
            message: panic_message(payload.as_ref()),
        }),
    }
}

/// Installs a hook that records panic locations on the calling thread instead
/// of printing them, and returns the hook it replaced.
fn silence_panic_hook(location: Arc<Mutex<Option<String>>>) -> PanicHook {
    let previous: PanicHook = Arc::from(panic::take_hook());
    let delegate = Arc::clone(&previous);
    let bootstrap_thread = thread::current().id();
    panic::set_hook(Box::new(move |info| {
        if thread::current().id() != bootstrap_thread {
            delegate(info);
            return;
        }
        if let (Some(at), Ok(mut slot)) = (info.location(), location.lock()) {
            *slot = Some(at.to_string());
        }
    }));
    previous
}

fn restore_panic_hook(previous: PanicHook) {
    panic::set_hook(Box::new(move |info| previous(info)));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return (*message).to_owned();
    }
    payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_else(|| String::from("non-string panic payload"))
}
