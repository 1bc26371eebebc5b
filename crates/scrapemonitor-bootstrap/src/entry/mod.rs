//! The contract a daemon module implements to be bootstrapped.
//!
//! A daemon exposes a single entry operation, [`DaemonEntryPoint::main`],
//! which receives the process argument vector and returns nothing on success.
//! It is expected to block for the lifetime of the daemon.

use std::error::Error;
use std::fmt;

use thiserror::Error;

/// Entry operation exposed by a bootstrappable daemon module.
///
/// Closures taking the argument vector implement the trait directly, which
/// keeps small daemons and test doubles free of boilerplate.
///
/// # Example
///
/// ```
/// use scrapemonitor_bootstrap::{DaemonEntryPoint, DaemonFailure};
///
/// struct Echo;
///
/// impl DaemonEntryPoint for Echo {
///     fn main(&self, args: &[String]) -> Result<(), DaemonFailure> {
///         if args.is_empty() {
///             return Err(DaemonFailure::msg("no arguments supplied"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(Echo.main(&["--once".to_owned()]).is_ok());
/// ```
pub trait DaemonEntryPoint {
    /// Runs the daemon with the argument vector forwarded from the process.
    ///
    /// # Errors
    ///
    /// Returns a [`DaemonFailure`] when the daemon cannot start or stops
    /// abnormally.
    fn main(&self, args: &[String]) -> Result<(), DaemonFailure>;
}

impl<F> DaemonEntryPoint for F
where
    F: Fn(&[String]) -> Result<(), DaemonFailure>,
{
    fn main(&self, args: &[String]) -> Result<(), DaemonFailure> {
        self(args)
    }
}

/// Error raised by a daemon's entry operation.
///
/// Any error type converts into a failure through `?`; the concrete type name
/// is captured at conversion so diagnostics can name the original error rather
/// than this wrapper.
pub struct DaemonFailure {
    type_name: &'static str,
    inner: Box<dyn Error + Send + Sync + 'static>,
}

impl DaemonFailure {
    /// Wraps an error raised by the daemon.
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<E>(),
            inner: Box::new(error),
        }
    }

    /// Builds a failure from a plain message.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(DaemonMessage(message.into()))
    }

    /// Fully-qualified type name of the wrapped error.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the wrapped error.
    #[must_use]
    pub fn error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Splits the failure into its type name and the wrapped error.
    #[must_use]
    pub fn into_parts(self) -> (&'static str, Box<dyn Error + Send + Sync + 'static>) {
        (self.type_name, self.inner)
    }
}

impl<E> From<E> for DaemonFailure
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for DaemonFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaemonFailure")
            .field("type_name", &self.type_name)
            .field("error", &self.inner)
            .finish()
    }
}

impl fmt::Display for DaemonFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Message-only error produced by [`DaemonFailure::msg`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DaemonMessage(pub String);
