//! The state machine runtime.
//!
//! This module holds the imperative part of the crate:
//! - `StateMachine`: registry, current/previous state, transitions, ticks
//! - `StateContext`: the view a state gets of its machine during a hook
//! - `FsmError`: programmer errors that fail an operation
//!
//! # Transition protocol
//!
//! `change_state(target)` resolves `target` first; an unknown target is
//! reported and nothing else happens. Otherwise the outgoing state's
//! `on_exit` runs to completion before the incoming state's `on_enter`
//! starts. Transitions requested from inside hooks are queued and applied
//! after the hook returns.

mod context;
mod error;
#[allow(clippy::module_inception)]
mod machine;

pub use context::StateContext;
pub use error::FsmError;
pub use machine::{MachinePhase, Registration, StateMachine, TransitionOutcome};
