//! Tickstate: an embeddable, tick-driven finite state machine runtime.
//!
//! A [`StateMachine`] owns a registry of named states, tracks the current
//! and previous state, orchestrates transitions between them, and carries a
//! [`Blackboard`] that states and the host use to exchange data.
//!
//! # Core Concepts
//!
//! - **StateId**: explicit, stable identifiers (enums via [`state_id!`],
//!   `String`, or `&'static str`)
//! - **StateNode**: behavior with `on_create`, `on_enter`, `on_update` and
//!   `on_exit` hooks
//! - **Transitions**: `on_exit` of the outgoing state always completes before
//!   `on_enter` of the incoming one
//! - **Diagnostics**: rejections and transitions go to an injected sink
//!
//! # Example
//!
//! ```rust
//! use tickstate::diagnostics::MemoryDiagnostics;
//! use tickstate::machine::{StateContext, StateMachine};
//! use tickstate::{state_id, StateNode};
//!
//! state_id! {
//!     enum Door {
//!         Closed,
//!         Open,
//!     }
//! }
//!
//! struct Closed;
//! struct Open {
//!     ticks: u32,
//! }
//!
//! impl StateNode<Door> for Closed {
//!     fn on_update(&mut self, ctx: &mut StateContext<'_, Door>) {
//!         if ctx.blackboard_value::<bool>("knock") == Ok(Some(&true)) {
//!             ctx.change_state(Door::Open);
//!         }
//!     }
//! }
//!
//! impl StateNode<Door> for Open {
//!     fn on_enter(&mut self, ctx: &mut StateContext<'_, Door>) {
//!         self.ticks = 0;
//!         ctx.set_blackboard_value("knock", false);
//!     }
//!
//!     fn on_update(&mut self, ctx: &mut StateContext<'_, Door>) {
//!         self.ticks += 1;
//!         if self.ticks == 2 {
//!             ctx.change_state(Door::Closed);
//!         }
//!     }
//! }
//!
//! let sink = MemoryDiagnostics::new();
//! let mut door: StateMachine<Door> = StateMachine::new(());
//! door.set_diagnostics(sink.clone());
//! door.add_state(Door::Closed, Closed).unwrap();
//! door.add_state(Door::Open, Open { ticks: 0 }).unwrap();
//! door.run(Door::Closed).unwrap();
//!
//! door.set_blackboard_value("knock", true);
//! door.update();
//! assert_eq!(door.current_state_id(), Some(&Door::Open));
//!
//! door.update();
//! door.update();
//! assert_eq!(door.current_state_id(), Some(&Door::Closed));
//! assert_eq!(sink.transitions().len(), 2);
//! ```

pub mod blackboard;
pub mod builder;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod machine;

// Re-export commonly used types
pub use blackboard::{Blackboard, BlackboardError};
pub use builder::{BuildError, StateMachineBuilder};
pub use config::MachineConfig;
pub use self::core::{StateHistory, StateId, StateNode, TransitionRecord};
pub use diagnostics::{DiagnosticEvent, Diagnostics};
pub use machine::{
    FsmError, MachinePhase, Registration, StateContext, StateMachine, TransitionOutcome,
};
