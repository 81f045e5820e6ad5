//! Built-in diagnostics sinks.

use super::{DiagnosticEvent, Diagnostics};
use std::sync::{Arc, Mutex, MutexGuard};

/// Forwards events to `tracing` under the `tickstate` target.
///
/// Rejections are emitted at `warn`, starts at `info` and transitions at
/// `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        match &event {
            DiagnosticEvent::DuplicateState { state } => {
                tracing::warn!(target: "tickstate", state = %state, "{event}");
            }
            DiagnosticEvent::MissingState { state } => {
                tracing::warn!(target: "tickstate", state = %state, "{event}");
            }
            DiagnosticEvent::RequestDiscarded { target, .. } => {
                tracing::warn!(target: "tickstate", state = %target, "{event}");
            }
            DiagnosticEvent::Started { state } => {
                tracing::info!(target: "tickstate", state = %state, "{event}");
            }
            DiagnosticEvent::Transition { from, to } => {
                tracing::debug!(target: "tickstate", from = %from, to = %to, "{event}");
            }
        }
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn report(&self, _event: DiagnosticEvent) {}
}

/// Records events in memory.
///
/// Clones share the same buffer, so a host can hand one clone to the machine
/// and keep another to inspect what was reported.
///
/// # Example
///
/// ```rust
/// use tickstate::diagnostics::{DiagnosticEvent, Diagnostics, MemoryDiagnostics};
///
/// let sink = MemoryDiagnostics::new();
/// let handle = sink.clone();
/// sink.report(DiagnosticEvent::MissingState { state: "Z".into() });
///
/// assert_eq!(handle.error_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDiagnostics {
    events: Arc<Mutex<Vec<DiagnosticEvent>>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DiagnosticEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.lock().clone()
    }

    /// Recorded events that report a rejection.
    pub fn errors(&self) -> Vec<DiagnosticEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn error_count(&self) -> usize {
        self.lock().iter().filter(|e| e.is_error()).count()
    }

    /// Recorded transitions as `(from, to)` name pairs.
    pub fn transitions(&self) -> Vec<(String, String)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                DiagnosticEvent::Transition { from, to } => Some((from.clone(), to.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        self.lock().push(event);
    }
}
