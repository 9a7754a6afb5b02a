//! Validation diagnostics.
//!
//! Validation never aborts on a data error. Every problem is reported to a
//! [`Recorder`] together with the context path that was active when it was
//! found, so one pass over a rule document surfaces every problem at once.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator used when rendering a context path.
pub const CONTEXT_SEPARATOR: &str = " > ";

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Informational note.
    Info,
    /// Suspicious but usable configuration.
    Warn,
    /// The configuration must not be used for matching.
    Error,
}

impl Level {
    /// Return the `snake_case` string representation (matches serde serialization).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub level: Level,
    /// Rendered context path, e.g. `AggRules[default] > AggRule[default] > LevelMap`.
    pub context: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "[{}] {}", self.level, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.level, self.context, self.message)
        }
    }
}

/// Sink that validation reports into.
///
/// Implementations keep a stack of context names; every call to
/// [`report`](Self::report) is attributed to the current stack.
pub trait Recorder {
    /// Enter a named context.
    fn push_context(&mut self, name: &str);

    /// Leave the innermost context.
    fn pop_context(&mut self);

    /// Report a message at the given level against the current context.
    fn report(&mut self, level: Level, message: &str);

    /// Report an `Error`.
    fn error(&mut self, message: &str) {
        self.report(Level::Error, message);
    }

    /// Report a `Warn`.
    fn warn(&mut self, message: &str) {
        self.report(Level::Warn, message);
    }

    /// Report an `Info`.
    fn info(&mut self, message: &str) {
        self.report(Level::Info, message);
    }

    /// Run `f` inside the named context. The context is popped on every
    /// return path out of `f`.
    fn scoped<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T
    where
        Self: Sized,
    {
        self.push_context(name);
        let out = f(self);
        self.pop_context();
        out
    }
}

/// A [`Recorder`] that keeps every diagnostic in memory and mirrors errors
/// and warnings to `tracing`.
#[derive(Debug, Default)]
pub struct ListRecorder {
    contexts: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ListRecorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current context path, rendered.
    #[must_use]
    pub fn context_path(&self) -> String {
        self.contexts.join(CONTEXT_SEPARATOR)
    }

    /// Every diagnostic reported so far, in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the recorder, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Number of diagnostics at `level`.
    #[must_use]
    pub fn count(&self, level: Level) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    /// Returns `true` if any `Error` has been reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == Level::Error)
    }

    /// Iterate over the `Error` diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.level == Level::Error)
    }
}

impl Recorder for ListRecorder {
    fn push_context(&mut self, name: &str) {
        self.contexts.push(name.to_owned());
    }

    fn pop_context(&mut self) {
        self.contexts.pop();
    }

    fn report(&mut self, level: Level, message: &str) {
        let context = self.context_path();
        match level {
            Level::Error => tracing::warn!(%context, detail = message, "rule validation error"),
            Level::Warn => tracing::debug!(%context, detail = message, "rule validation warning"),
            Level::Info => tracing::trace!(%context, detail = message, "rule validation note"),
        }
        self.diagnostics.push(Diagnostic {
            level,
            context,
            message: message.to_owned(),
        });
    }
}
