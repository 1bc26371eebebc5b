//! Module identity and definitions.
//!
//! A [`ModuleDefinition`] pairs a validated [`ModuleName`] with what the
//! module exports. Daemon modules carry an [`EntryPointFactory`] that builds
//! their [`DaemonEntryPoint`] on demand; library modules carry nothing and can
//! be resolved but never started.

use std::borrow::Borrow;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::entry::DaemonEntryPoint;

/// Error produced when a module factory fails to build its entry point.
pub type LoadError = Box<dyn Error + Send + Sync + 'static>;

/// Deferred constructor for a daemon module's entry point.
pub type EntryPointFactory =
    Arc<dyn Fn() -> Result<Box<dyn DaemonEntryPoint>, LoadError> + Send + Sync>;

/// Reasons a module name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleNameError {
    /// The name was empty.
    #[error("module name is empty")]
    Empty,
    /// The name carried leading or trailing whitespace.
    #[error("module name '{name}' has surrounding whitespace")]
    Whitespace {
        /// Name as supplied.
        name: String,
    },
    /// Two separators were adjacent, or the name began or ended with one.
    #[error("module name '{name}' contains an empty segment")]
    EmptySegment {
        /// Name as supplied.
        name: String,
    },
    /// A segment was not a valid identifier.
    #[error("module name '{name}' has invalid segment '{segment}'")]
    InvalidSegment {
        /// Name as supplied.
        name: String,
        /// Offending segment.
        segment: String,
    },
}

/// Validated, fully-qualified module name such as
/// `edu.berkeley.scrapemonitor.ScrapeMonitorDaemon`.
///
/// Names are dot-separated identifiers. Each identifier starts with a letter,
/// `_`, or `$`, followed by letters, digits, `_`, or `$`.
///
/// # Example
///
/// ```
/// use scrapemonitor_bootstrap::ModuleName;
///
/// let name = ModuleName::parse("edu.berkeley.scrapemonitor.ScrapeMonitorDaemon")
///     .expect("valid name");
/// assert_eq!(name.simple_name(), "ScrapeMonitorDaemon");
/// assert_eq!(name.package(), Some("edu.berkeley.scrapemonitor"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleName(String);

impl ModuleName {
    /// Validates and wraps a fully-qualified name.
    ///
    /// # Errors
    ///
    /// Returns a [`ModuleNameError`] describing the first problem found.
    pub fn parse(raw: &str) -> Result<Self, ModuleNameError> {
        if raw.is_empty() {
            return Err(ModuleNameError::Empty);
        }
        if raw.trim() != raw {
            return Err(ModuleNameError::Whitespace {
                name: raw.to_owned(),
            });
        }
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(ModuleNameError::EmptySegment {
                    name: raw.to_owned(),
                });
            }
            if !is_identifier(segment) {
                return Err(ModuleNameError::InvalidSegment {
                    name: raw.to_owned(),
                    segment: segment.to_owned(),
                });
            }
        }
        Ok(Self(raw.to_owned()))
    }

    /// Returns the name as text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Last segment of the name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(self.0.as_str())
    }

    /// Everything before the last segment, if the name is qualified.
    #[must_use]
    pub fn package(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(package, _)| package)
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl FromStr for ModuleName {
    type Err = ModuleNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ModuleName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// What a module exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// Exposes a `main` entry operation and can be bootstrapped.
    Daemon,
    /// Shared code with no entry operation.
    Library,
}

impl ModuleKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daemon => "daemon",
            Self::Library => "library",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named module visible to the bootstrap loader.
#[derive(Clone)]
pub struct ModuleDefinition {
    name: ModuleName,
    entry: Option<EntryPointFactory>,
}

impl ModuleDefinition {
    /// Defines a daemon module whose entry point is built by `factory`.
    ///
    /// The factory runs once per bootstrap attempt, only when the module is
    /// actually started.
    #[must_use]
    pub fn daemon<F, E>(name: ModuleName, factory: F) -> Self
    where
        F: Fn() -> Result<E, LoadError> + Send + Sync + 'static,
        E: DaemonEntryPoint + 'static,
    {
        let entry: EntryPointFactory = Arc::new(move || {
            factory().map(|entry| Box::new(entry) as Box<dyn DaemonEntryPoint>)
        });
        Self {
            name,
            entry: Some(entry),
        }
    }

    /// Defines a library module with no entry operation.
    #[must_use]
    pub const fn library(name: ModuleName) -> Self {
        Self { name, entry: None }
    }

    /// Returns the module name.
    #[must_use]
    pub const fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Returns what the module exports.
    #[must_use]
    pub const fn kind(&self) -> ModuleKind {
        if self.entry.is_some() {
            ModuleKind::Daemon
        } else {
            ModuleKind::Library
        }
    }

    pub(crate) const fn entry_factory(&self) -> Option<&EntryPointFactory> {
        self.entry.as_ref()
    }
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
