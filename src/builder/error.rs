//! Build errors for the state machine builder.

use crate::machine::FsmError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Owner not specified. Call .owner(owner) before .build()")]
    MissingOwner,

    #[error(transparent)]
    Machine(#[from] FsmError),
}
