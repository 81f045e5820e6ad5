//! Blackboard error types.

use thiserror::Error;

/// Errors returned by the typed blackboard accessors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlackboardError {
    /// The key holds a value of a different type than requested
    #[error("Blackboard key '{key}' holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}
