//! Non-fatal events raised while mapping, delivered to an injected sink.
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::parser::SkippedLine;

/// Which way a value was travelling when a field was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Value to document.
    Serialize,
    /// Document to value.
    Deserialize,
}

/// A recoverable event reported by the mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An item was present but could not be decoded; the field keeps its
    /// default.
    FieldDefaulted {
        /// Type declaring the field.
        type_name: &'static str,
        /// Field name.
        field: &'static str,
        /// Item key that was read.
        key: String,
        /// Text that failed to decode.
        value: String,
    },
    /// A field was skipped because it lacks the accessor this direction
    /// needs.
    FieldSkipped {
        /// Type declaring the field.
        type_name: &'static str,
        /// Field name.
        field: &'static str,
        /// Direction of the skipped pass.
        direction: Direction,
    },
    /// A value was left out of the document because no rendering of it
    /// reads back unchanged, or its key is not writable.
    ValueNotWritten {
        /// Type declaring the field.
        type_name: &'static str,
        /// Field name.
        field: &'static str,
        /// Item key that was not written.
        key: String,
    },
    /// The parser rejected a line of the input.
    LineSkipped(SkippedLine),
    /// A file could not be loaded; the default value was returned.
    LoadFailed {
        /// File that failed to load.
        path: PathBuf,
        /// Rendered error.
        message: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldDefaulted {
                type_name,
                field,
                key,
                value,
            } => write!(
                f,
                "{type_name}.{field}: '{value}' in key '{key}' is not valid, keeping the default"
            ),
            Self::FieldSkipped {
                type_name,
                field,
                direction,
            } => {
                let accessor = match direction {
                    Direction::Serialize => "getter (or setter)",
                    Direction::Deserialize => "setter",
                };
                write!(f, "{type_name}.{field}: skipped, no {accessor}")
            }
            Self::ValueNotWritten {
                type_name,
                field,
                key,
            } => write!(
                f,
                "{type_name}.{field}: value for key '{key}' would not read back, not written"
            ),
            Self::LineSkipped(skipped) => {
                write!(f, "skipped line {}: {}", skipped.line, skipped.reason)
            }
            Self::LoadFailed { path, message } => {
                write!(f, "could not load {}: {message}", path.display())
            }
        }
    }
}

/// Receiver for [`Diagnostic`]s.
pub trait DiagnosticsSink {
    /// Handle one event.
    fn report(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<S> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Forwards events to [`tracing`].
///
/// Defaulted fields, unwritten values and failed loads are warnings; skipped lines are debug
/// output and skipped fields are trace output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::FieldDefaulted { .. }
            | Diagnostic::ValueNotWritten { .. }
            | Diagnostic::LoadFailed { .. } => {
                tracing::warn!("{diagnostic}");
            }
            Diagnostic::LineSkipped(_) => tracing::debug!("{diagnostic}"),
            Diagnostic::FieldSkipped { .. } => tracing::trace!("{diagnostic}"),
        }
    }
}

/// Keeps every event in memory.
///
/// Share it through an [`Arc`] to read events back after mapping.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all events collected so far.
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticsSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkipReason;

    #[test]
    fn memory_sink_collects_through_arc() {
        let sink = Arc::new(MemorySink::new());
        let shared = Arc::clone(&sink);
        shared.report(Diagnostic::LineSkipped(SkippedLine {
            line: 2,
            reason: SkipReason::EmptyKey,
        }));
        let events = sink.take();
        assert_eq!(events.len(), 1);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn field_defaulted_display() {
        let d = Diagnostic::FieldDefaulted {
            type_name: "Window",
            field: "width",
            key: "Width".to_string(),
            value: "wide".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "Window.width: 'wide' in key 'Width' is not valid, keeping the default"
        );
    }

    #[test]
    fn field_skipped_display_names_missing_accessor() {
        let d = Diagnostic::FieldSkipped {
            type_name: "Window",
            field: "id",
            direction: Direction::Deserialize,
        };
        assert_eq!(d.to_string(), "Window.id: skipped, no setter");
    }

    #[test]
    fn value_not_written_display() {
        let d = Diagnostic::ValueNotWritten {
            type_name: "Window",
            field: "title",
            key: "Title".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "Window.title: value for key 'Title' would not read back, not written"
        );
    }

    #[test]
    fn noop_and_tracing_sinks_accept_events() {
        let d = Diagnostic::LoadFailed {
            path: PathBuf::from("a.ini"),
            message: "gone".to_string(),
        };
        NoopSink.report(d.clone());
        TracingSink.report(d);
    }
}
