//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::core::{StateId, StateNode};
use crate::diagnostics::Diagnostics;
use crate::machine::StateMachine;

/// Builder for constructing state machines with a fluent API.
///
/// States are registered in the order they were added, so `on_create` hooks
/// run in that order. Duplicates are reported to the configured diagnostics
/// sink exactly as [`StateMachine::add_state`] would.
pub struct StateMachineBuilder<K: StateId, O = ()> {
    owner: Option<O>,
    config: MachineConfig,
    diagnostics: Option<Box<dyn Diagnostics>>,
    states: Vec<(K, Box<dyn StateNode<K, O>>)>,
    initial: Option<K>,
}

impl<K: StateId, O> StateMachineBuilder<K, O> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            owner: None,
            config: MachineConfig::default(),
            diagnostics: None,
            states: Vec::new(),
            initial: None,
        }
    }

    /// Set the owner (required).
    pub fn owner(mut self, owner: O) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the diagnostics sink (defaults to tracing).
    pub fn diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Some(Box::new(diagnostics));
        self
    }

    /// Add a state.
    pub fn state<N>(mut self, id: impl Into<K>, node: N) -> Self
    where
        N: StateNode<K, O> + 'static,
    {
        self.states.push((id.into(), Box::new(node)));
        self
    }

    /// Start the built machine in `state`.
    pub fn initial(mut self, state: impl Into<K>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Build the state machine.
    /// Returns an error if the owner is missing, a state id is empty, or the
    /// initial state is not registered.
    pub fn build(self) -> Result<StateMachine<K, O>, BuildError> {
        let owner = self.owner.ok_or(BuildError::MissingOwner)?;

        let mut machine = StateMachine::with_config(owner, self.config);
        if let Some(diagnostics) = self.diagnostics {
            machine.set_boxed_diagnostics(diagnostics);
        }

        for (id, node) in self.states {
            machine.add_boxed_state(id, node)?;
        }

        if let Some(initial) = self.initial {
            machine.run(initial)?;
        }

        Ok(machine)
    }
}

impl<K: StateId, O> Default for StateMachineBuilder<K, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEvent, MemoryDiagnostics};
    use crate::machine::{FsmError, MachinePhase, StateContext};

    crate::state_id! {
        enum Light {
            Red,
            Green,
        }
    }

    struct Lamp {
        color: &'static str,
    }

    impl StateNode<Light, String> for Lamp {
        fn on_create(&mut self, ctx: &mut StateContext<'_, Light, String>) {
            let key = format!("{}:{}", ctx.owner(), self.color);
            ctx.set_blackboard_value(key, true);
        }
    }

    #[test]
    fn builder_validates_required_owner() {
        let result = StateMachineBuilder::<Light, String>::new().build();

        assert!(matches!(result, Err(BuildError::MissingOwner)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::<Light, String>::new()
            .owner("crossing".to_string())
            .config(MachineConfig::with_capacity(2, 2))
            .state(Light::Red, Lamp { color: "red" })
            .state(Light::Green, Lamp { color: "green" })
            .build()
            .unwrap();

        assert_eq!(machine.phase(), MachinePhase::Idle);
        assert_eq!(machine.state_count(), 2);
        assert_eq!(
            machine.blackboard_value::<bool>("crossing:green"),
            Ok(Some(&true))
        );
        assert_eq!(machine.config().node_capacity, 2);
    }

    #[test]
    fn initial_state_starts_machine() {
        let machine = StateMachine::<Light, String>::builder()
            .owner("crossing".to_string())
            .state(Light::Red, Lamp { color: "red" })
            .initial(Light::Red)
            .build()
            .unwrap();

        assert_eq!(machine.current_state_id(), Some(&Light::Red));
    }

    #[test]
    fn unknown_initial_state_fails() {
        let result = StateMachine::<Light, String>::builder()
            .owner("crossing".to_string())
            .state(Light::Red, Lamp { color: "red" })
            .initial(Light::Green)
            .build();

        assert_eq!(
            result.unwrap_err(),
            BuildError::Machine(FsmError::NotFound {
                id: "Green".to_string()
            })
        );
    }

    #[test]
    fn duplicate_states_are_reported() {
        let sink = MemoryDiagnostics::new();
        let machine = StateMachine::<Light, String>::builder()
            .owner("crossing".to_string())
            .diagnostics(sink.clone())
            .state(Light::Red, Lamp { color: "red" })
            .state(Light::Red, Lamp { color: "crimson" })
            .build()
            .unwrap();

        assert_eq!(machine.state_count(), 1);
        assert!(!machine.blackboard().contains_key("crossing:crimson"));
        assert_eq!(
            sink.errors(),
            vec![DiagnosticEvent::DuplicateState {
                state: "Red".to_string()
            }]
        );
    }
}
