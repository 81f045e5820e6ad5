//! Core state machine types.
//!
//! This module contains the contracts the runtime is built around:
//! - State identifiers via the `StateId` trait
//! - State behavior via the `StateNode` lifecycle trait
//! - Bounded transition history

mod history;
mod state;

pub use history::{StateHistory, TransitionRecord};
pub use state::{StateId, StateNode};
