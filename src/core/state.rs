//! State identifiers and the lifecycle contract every state implements.
//!
//! A state machine is keyed by an explicit [`StateId`] chosen by the state
//! author (an enum, a `String`, or a `&'static str`) and drives the
//! [`StateNode`] registered under that id.

use crate::machine::StateContext;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// Identifiers are plain values: they are cloned into the machine's
/// `current`/`previous` slots and used as registry keys. The `name` is what
/// diagnostics print and what the machine checks for emptiness.
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateId;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Guard {
///     Patrol,
///     Chase,
/// }
///
/// impl StateId for Guard {
///     fn name(&self) -> &str {
///         match self {
///             Self::Patrol => "Patrol",
///             Self::Chase => "Chase",
///         }
///     }
/// }
///
/// assert_eq!(Guard::Chase.name(), "Chase");
/// assert!(!Guard::Patrol.is_empty());
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + Send + 'static {
    /// Get the identifier's name for display/logging.
    fn name(&self) -> &str;

    /// Check if the identifier is empty.
    ///
    /// Empty identifiers are rejected by every machine operation.
    fn is_empty(&self) -> bool {
        self.name().is_empty()
    }
}

impl StateId for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl StateId for &'static str {
    fn name(&self) -> &str {
        self
    }
}

/// Lifecycle hooks of a single state.
///
/// The machine owns every registered node for its whole lifetime. Hooks run
/// synchronously on the caller's thread and receive a [`StateContext`] that
/// gives access to the owner, the blackboard and transition requests.
///
/// All hooks default to no-ops.
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateNode;
/// use tickstate::machine::StateContext;
///
/// struct Idle {
///     ticks: u32,
/// }
///
/// impl StateNode<&'static str> for Idle {
///     fn on_enter(&mut self, _ctx: &mut StateContext<'_, &'static str>) {
///         self.ticks = 0;
///     }
///
///     fn on_update(&mut self, ctx: &mut StateContext<'_, &'static str>) {
///         self.ticks += 1;
///         if self.ticks >= 3 {
///             ctx.change_state("Walk");
///         }
///     }
/// }
/// ```
pub trait StateNode<K: StateId, O = ()>: Send {
    /// Called exactly once, when the node is registered.
    fn on_create(&mut self, ctx: &mut StateContext<'_, K, O>) {
        let _ = ctx;
    }

    /// Called each time this node becomes the current state.
    fn on_enter(&mut self, ctx: &mut StateContext<'_, K, O>) {
        let _ = ctx;
    }

    /// Called on every host tick while this node is current.
    fn on_update(&mut self, ctx: &mut StateContext<'_, K, O>) {
        let _ = ctx;
    }

    /// Called each time this node stops being current, before the next
    /// node's `on_enter`.
    fn on_exit(&mut self, ctx: &mut StateContext<'_, K, O>) {
        let _ = ctx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Idle,
        Running,
    }

    impl StateId for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Running => "Running",
            }
        }
    }

    #[test]
    fn enum_ids_report_their_names() {
        assert_eq!(TestState::Idle.name(), "Idle");
        assert_eq!(TestState::Running.name(), "Running");
        assert!(!TestState::Idle.is_empty());
    }

    #[test]
    fn string_ids_use_their_contents() {
        let id = String::from("Menu");
        assert_eq!(id.name(), "Menu");
        assert!(String::new().is_empty());
    }

    #[test]
    fn static_str_ids_use_their_contents() {
        let id: &'static str = "Boot";
        assert_eq!(StateId::name(&id), "Boot");
        assert!(StateId::is_empty(&""));
    }

    #[test]
    fn name_is_stable() {
        let state = TestState::Running;
        assert_eq!(state.name(), state.clone().name());
    }
}
