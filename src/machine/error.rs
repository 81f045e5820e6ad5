//! State machine error types.

use thiserror::Error;

/// Programmer errors that fail a machine operation outright.
///
/// Recoverable conditions (duplicate registration, transition to an unknown
/// state) are not errors; they are reported to the diagnostics sink and
/// surfaced as [`Registration`](super::Registration) /
/// [`TransitionOutcome`](super::TransitionOutcome) values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsmError {
    /// `run` named a state that was never registered
    #[error("Not found node: {id}")]
    NotFound { id: String },

    /// An empty identifier was passed to the machine
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `run` was called while a state is already active
    #[error("State machine is already running in '{current}'")]
    AlreadyRunning { current: String },

    /// `change_state` was called before `run`
    #[error("State machine has not been started")]
    NotRunning,
}
