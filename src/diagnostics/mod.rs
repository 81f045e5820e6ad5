//! Diagnostics reported by the state machine.
//!
//! The machine never logs directly. Every rejection and every transition is
//! turned into a [`DiagnosticEvent`] and handed to the [`Diagnostics`] sink
//! supplied by the host. Three sinks ship with the crate:
//!
//! - [`TracingDiagnostics`]: forwards to `tracing` (the default)
//! - [`NullDiagnostics`]: drops everything
//! - [`MemoryDiagnostics`]: records events for later inspection

mod sinks;

pub use sinks::{MemoryDiagnostics, NullDiagnostics, TracingDiagnostics};

use std::fmt;

/// Something the machine wants the host to know about.
///
/// State identifiers are carried by name so sinks need not be generic over
/// the machine's id type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// `add_state` was called with an id that is already registered
    DuplicateState { state: String },

    /// `change_state` named a state that is not registered
    MissingState { state: String },

    /// The machine was started in `state`
    Started { state: String },

    /// A transition is starting; reported before the outgoing `on_exit`
    Transition { from: String, to: String },

    /// A transition requested from inside a hook was dropped
    RequestDiscarded { target: String, reason: DiscardReason },
}

/// Why a deferred transition request was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Requested before the machine was started
    NotRunning,

    /// Too many transitions were chained within a single call
    ChainLimit(usize),

    /// Requested from `on_exit` while a transition was already underway
    DuringExit,
}

impl DiagnosticEvent {
    /// Whether the event reports a rejected operation.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateState { .. } | Self::MissingState { .. } | Self::RequestDiscarded { .. }
        )
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateState { state } => write!(f, "State node already existed: {state}"),
            Self::MissingState { state } => write!(f, "Cannot find state node: {state}"),
            Self::Started { state } => write!(f, "Started in {state}"),
            Self::Transition { from, to } => write!(f, "{from} --> {to}"),
            Self::RequestDiscarded {
                target,
                reason: DiscardReason::NotRunning,
            } => write!(f, "Dropped request for {target}: machine is not running"),
            Self::RequestDiscarded {
                target,
                reason: DiscardReason::ChainLimit(limit),
            } => write!(
                f,
                "Dropped request for {target}: more than {limit} chained transitions"
            ),
            Self::RequestDiscarded {
                target,
                reason: DiscardReason::DuringExit,
            } => write!(f, "Dropped request for {target}: made during on_exit"),
        }
    }
}

/// Passive sink the host supplies to observe the machine.
///
/// `report` must not call back into the machine.
pub trait Diagnostics: Send {
    fn report(&self, event: DiagnosticEvent);
}

impl<D: Diagnostics + Sync> Diagnostics for std::sync::Arc<D> {
    fn report(&self, event: DiagnosticEvent) {
        (**self).report(event)
    }
}
