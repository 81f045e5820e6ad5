//! The tick-driven state machine runtime.

use crate::blackboard::{Blackboard, BlackboardError};
use crate::builder::StateMachineBuilder;
use crate::config::MachineConfig;
use crate::core::{StateHistory, StateId, StateNode, TransitionRecord};
use crate::diagnostics::{DiagnosticEvent, Diagnostics, DiscardReason, TracingDiagnostics};
use crate::machine::context::StateContext;
use crate::machine::error::FsmError;
use chrono::Utc;
use std::any::Any;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Lifecycle of the machine object itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MachinePhase {
    /// Constructed, nothing registered
    Unbuilt,

    /// At least one state registered, not started
    Idle,

    /// Started; a current state is active
    Running,
}

/// Result of registering a state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The state was stored and its `on_create` ran
    Added,

    /// The id was already taken; the original registration was kept
    Duplicate,
}

/// Result of a `change_state` call that did not fail outright
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionOutcome<K: StateId> {
    /// `from` was exited and `to` entered
    Changed { from: K, to: K },

    /// The target is not registered; nothing changed
    Missing { requested: K },
}

impl<K: StateId> TransitionOutcome<K> {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

#[derive(Clone, Copy)]
enum Hook {
    Enter,
    Update,
    Exit,
}

/// Finite state machine driving a set of registered [`StateNode`]s.
///
/// The machine owns its states, the blackboard, and the injected diagnostics
/// sink. All operations are synchronous and expect exclusive access; hosts
/// sharing a machine across threads must wrap it in their own lock.
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateNode;
/// use tickstate::machine::{StateContext, StateMachine};
///
/// struct Idle;
/// struct Walk;
///
/// impl StateNode<&'static str> for Idle {
///     fn on_update(&mut self, ctx: &mut StateContext<'_, &'static str>) {
///         ctx.change_state("Walk");
///     }
/// }
///
/// impl StateNode<&'static str> for Walk {}
///
/// let mut machine: StateMachine<&'static str> = StateMachine::new(());
/// machine.add_state("Idle", Idle).unwrap();
/// machine.add_state("Walk", Walk).unwrap();
///
/// machine.run("Idle").unwrap();
/// machine.update();
///
/// assert_eq!(machine.current_state_id(), Some(&"Walk"));
/// assert_eq!(machine.previous_state_id(), Some(&"Idle"));
/// ```
pub struct StateMachine<K: StateId, O = ()> {
    owner: O,
    nodes: HashMap<K, Box<dyn StateNode<K, O>>>,
    blackboard: Blackboard,
    current: Option<K>,
    previous: Option<K>,
    pending: Option<K>,
    history: StateHistory<K>,
    diagnostics: Box<dyn Diagnostics>,
    config: MachineConfig,
}

impl<K: StateId, O> StateMachine<K, O> {
    /// Create an empty machine with the default configuration, reporting to
    /// [`TracingDiagnostics`].
    pub fn new(owner: O) -> Self {
        Self::with_config(owner, MachineConfig::default())
    }

    /// Create an empty machine with explicit capacity hints.
    pub fn with_capacity(owner: O, node_capacity: usize, blackboard_capacity: usize) -> Self {
        Self::with_config(
            owner,
            MachineConfig::with_capacity(node_capacity, blackboard_capacity),
        )
    }

    pub fn with_config(owner: O, config: MachineConfig) -> Self {
        Self {
            owner,
            nodes: HashMap::with_capacity(config.node_capacity),
            blackboard: Blackboard::with_capacity(config.blackboard_capacity),
            current: None,
            previous: None,
            pending: None,
            history: StateHistory::with_limit(config.history_limit),
            diagnostics: Box::new(TracingDiagnostics),
            config,
        }
    }

    pub fn builder() -> StateMachineBuilder<K, O> {
        StateMachineBuilder::new()
    }

    /// Replace the diagnostics sink.
    pub fn set_diagnostics(&mut self, diagnostics: impl Diagnostics + 'static) {
        self.diagnostics = Box::new(diagnostics);
    }

    pub(crate) fn set_boxed_diagnostics(&mut self, diagnostics: Box<dyn Diagnostics>) {
        self.diagnostics = diagnostics;
    }

    /// Register `node` under `id`.
    ///
    /// Runs the node's `on_create` exactly once, then stores it. A duplicate
    /// id leaves the registry untouched, reports a
    /// [`DiagnosticEvent::DuplicateState`] and returns
    /// [`Registration::Duplicate`]; the rejected node is dropped without
    /// `on_create` being called.
    pub fn add_state<N>(&mut self, id: impl Into<K>, node: N) -> Result<Registration, FsmError>
    where
        N: StateNode<K, O> + 'static,
    {
        let node: Box<dyn StateNode<K, O>> = Box::new(node);
        self.register(id.into(), move || node)
    }

    /// Register an already boxed node.
    pub fn add_boxed_state(
        &mut self,
        id: K,
        node: Box<dyn StateNode<K, O>>,
    ) -> Result<Registration, FsmError> {
        self.register(id, move || node)
    }

    /// Register the node built by `factory`.
    ///
    /// The factory only runs when `id` is not registered yet.
    pub fn add_state_with<N, F>(
        &mut self,
        id: impl Into<K>,
        factory: F,
    ) -> Result<Registration, FsmError>
    where
        N: StateNode<K, O> + 'static,
        F: FnOnce() -> N,
    {
        self.register(id.into(), move || {
            Box::new(factory()) as Box<dyn StateNode<K, O>>
        })
    }

    fn register<F>(&mut self, id: K, make: F) -> Result<Registration, FsmError>
    where
        F: FnOnce() -> Box<dyn StateNode<K, O>>,
    {
        ensure_named(&id)?;

        if self.nodes.contains_key(&id) {
            self.report(DiagnosticEvent::DuplicateState {
                state: id.name().to_string(),
            });
            return Ok(Registration::Duplicate);
        }

        let mut node = make();
        let mut ctx = StateContext::new(
            &self.owner,
            &mut self.blackboard,
            &id,
            self.current.as_ref(),
            self.previous.as_ref(),
            &mut self.pending,
        );
        node.on_create(&mut ctx);
        self.nodes.insert(id, node);

        self.apply_pending();
        Ok(Registration::Added)
    }

    /// Start the machine in `entry`.
    ///
    /// Sets both the current and previous state to `entry` and runs its
    /// `on_enter`. Fails without side effects when `entry` is not registered
    /// or when the machine is already running.
    pub fn run(&mut self, entry: impl Into<K>) -> Result<(), FsmError> {
        let entry = entry.into();
        ensure_named(&entry)?;

        if let Some(current) = &self.current {
            return Err(FsmError::AlreadyRunning {
                current: current.name().to_string(),
            });
        }
        if !self.nodes.contains_key(&entry) {
            return Err(FsmError::NotFound {
                id: entry.name().to_string(),
            });
        }

        self.report(DiagnosticEvent::Started {
            state: entry.name().to_string(),
        });
        self.current = Some(entry.clone());
        self.previous = Some(entry);
        self.call_current(Hook::Enter);

        self.apply_pending();
        Ok(())
    }

    /// Transition to `target`.
    ///
    /// In order: the current state is recorded as previous, its `on_exit`
    /// runs, `target` becomes current and its `on_enter` runs. An
    /// unregistered target is reported and leaves the machine
    /// exactly as it was.
    ///
    /// The returned outcome describes this hop only; transitions requested
    /// by the entered state's hooks are applied afterwards and are not
    /// reflected in it.
    pub fn change_state(&mut self, target: impl Into<K>) -> Result<TransitionOutcome<K>, FsmError> {
        let target = target.into();
        ensure_named(&target)?;

        let Some(from) = self.current.clone() else {
            return Err(FsmError::NotRunning);
        };

        let outcome = self.transition(from, target);
        self.apply_pending();
        Ok(outcome)
    }

    /// Tick the current state. Does nothing before `run`.
    pub fn update(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.call_current(Hook::Update);
        self.apply_pending();
    }

    fn transition(&mut self, from: K, to: K) -> TransitionOutcome<K> {
        if !self.nodes.contains_key(&to) {
            self.report(DiagnosticEvent::MissingState {
                state: to.name().to_string(),
            });
            return TransitionOutcome::Missing { requested: to };
        }

        self.report(DiagnosticEvent::Transition {
            from: from.name().to_string(),
            to: to.name().to_string(),
        });

        self.previous = Some(from.clone());
        self.call_current(Hook::Exit);
        if let Some(target) = self.pending.take() {
            self.report(DiagnosticEvent::RequestDiscarded {
                target: target.name().to_string(),
                reason: DiscardReason::DuringExit,
            });
        }
        self.current = Some(to.clone());
        self.call_current(Hook::Enter);

        self.history.record(TransitionRecord {
            from: from.clone(),
            to: to.clone(),
            timestamp: Utc::now(),
        });

        TransitionOutcome::Changed { from, to }
    }

    /// Apply transitions requested from inside hooks until none is left.
    fn apply_pending(&mut self) {
        let limit = self.config.max_chained_transitions;
        let mut chained = 0;

        while let Some(target) = self.pending.take() {
            let Some(from) = self.current.clone() else {
                self.report(DiagnosticEvent::RequestDiscarded {
                    target: target.name().to_string(),
                    reason: DiscardReason::NotRunning,
                });
                continue;
            };

            if chained >= limit {
                self.report(DiagnosticEvent::RequestDiscarded {
                    target: target.name().to_string(),
                    reason: DiscardReason::ChainLimit(limit),
                });
                break;
            }

            chained += 1;
            self.transition(from, target);
        }
    }

    fn call_current(&mut self, hook: Hook) {
        let Some(id) = self.current.as_ref() else {
            return;
        };
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };

        let mut ctx = StateContext::new(
            &self.owner,
            &mut self.blackboard,
            id,
            Some(id),
            self.previous.as_ref(),
            &mut self.pending,
        );
        match hook {
            Hook::Enter => node.on_enter(&mut ctx),
            Hook::Update => node.on_update(&mut ctx),
            Hook::Exit => node.on_exit(&mut ctx),
        }
    }

    fn report(&self, event: DiagnosticEvent) {
        self.diagnostics.report(event);
    }

    /// Insert or overwrite a blackboard value.
    pub fn set_blackboard_value<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.blackboard.set(key, value);
    }

    /// Raw blackboard value, or `None` if the key was never set.
    pub fn get_blackboard_value(&self, key: &str) -> Option<&(dyn Any + Send)> {
        self.blackboard.get_value(key)
    }

    /// Typed blackboard value; see [`Blackboard::get`].
    pub fn blackboard_value<T: Any>(&self, key: &str) -> Result<Option<&T>, BlackboardError> {
        self.blackboard.get::<T>(key)
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn current_state_id(&self) -> Option<&K> {
        self.current.as_ref()
    }

    pub fn previous_state_id(&self) -> Option<&K> {
        self.previous.as_ref()
    }

    /// Name of the current state, or `""` before `run`.
    pub fn current_state_name(&self) -> &str {
        self.current.as_ref().map_or("", |id| id.name())
    }

    /// Name of the previous state, or `""` before `run`.
    pub fn previous_state_name(&self) -> &str {
        self.previous.as_ref().map_or("", |id| id.name())
    }

    pub fn phase(&self) -> MachinePhase {
        if self.current.is_some() {
            MachinePhase::Running
        } else if self.nodes.is_empty() {
            MachinePhase::Unbuilt
        } else {
            MachinePhase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    pub fn contains_state<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.contains_key(id)
    }

    pub fn state_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn state_ids(&self) -> impl Iterator<Item = &K> {
        self.nodes.keys()
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    pub fn history(&self) -> &StateHistory<K> {
        &self.history
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }
}

fn ensure_named<K: StateId>(id: &K) -> Result<(), FsmError> {
    if id.is_empty() {
        return Err(FsmError::InvalidArgument(format!(
            "state identifier {id:?} has an empty name"
        )));
    }
    Ok(())
}

impl<K: StateId, O> fmt::Debug for StateMachine<K, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("states", &self.nodes.keys().collect::<Vec<_>>())
            .field("blackboard", &self.blackboard)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use std::sync::{Arc, Mutex};

    crate::state_id! {
        enum Mode {
            Idle,
            Patrol,
            Attack,
        }
    }

    type Log = Arc<Mutex<Vec<String>>>;

    struct Tracker {
        name: &'static str,
        log: Log,
    }

    impl Tracker {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Arc::clone(log),
            }
        }

        fn push(&self, hook: &str) {
            self.log.lock().unwrap().push(format!("{}:{hook}", self.name));
        }
    }

    impl StateNode<Mode> for Tracker {
        fn on_create(&mut self, _ctx: &mut StateContext<'_, Mode>) {
            self.push("create");
        }

        fn on_enter(&mut self, _ctx: &mut StateContext<'_, Mode>) {
            self.push("enter");
        }

        fn on_update(&mut self, _ctx: &mut StateContext<'_, Mode>) {
            self.push("update");
        }

        fn on_exit(&mut self, _ctx: &mut StateContext<'_, Mode>) {
            self.push("exit");
        }
    }

    fn machine(log: &Log) -> (StateMachine<Mode>, MemoryDiagnostics) {
        let sink = MemoryDiagnostics::new();
        let mut machine: StateMachine<Mode> = StateMachine::new(());
        machine.set_diagnostics(sink.clone());
        machine.add_state(Mode::Idle, Tracker::new("Idle", log)).unwrap();
        machine
            .add_state(Mode::Patrol, Tracker::new("Patrol", log))
            .unwrap();
        log.lock().unwrap().clear();
        (machine, sink)
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn phases_follow_registration_and_run() {
        let log = Log::default();
        let mut machine: StateMachine<Mode> = StateMachine::new(());
        assert_eq!(machine.phase(), MachinePhase::Unbuilt);

        machine.add_state(Mode::Idle, Tracker::new("Idle", &log)).unwrap();
        assert_eq!(machine.phase(), MachinePhase::Idle);

        machine.run(Mode::Idle).unwrap();
        assert_eq!(machine.phase(), MachinePhase::Running);
        assert!(machine.is_running());
    }

    #[test]
    fn run_enters_without_exit() {
        let log = Log::default();
        let (mut machine, _) = machine(&log);

        machine.run(Mode::Idle).unwrap();

        assert_eq!(entries(&log), vec!["Idle:enter"]);
        assert_eq!(machine.current_state_id(), Some(&Mode::Idle));
        assert_eq!(machine.previous_state_id(), Some(&Mode::Idle));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn rerun_is_rejected() {
        let log = Log::default();
        let (mut machine, _) = machine(&log);
        machine.run(Mode::Idle).unwrap();

        let err = machine.run(Mode::Patrol).unwrap_err();

        assert_eq!(
            err,
            FsmError::AlreadyRunning {
                current: "Idle".to_string()
            }
        );
        assert_eq!(machine.current_state_id(), Some(&Mode::Idle));
        assert_eq!(entries(&log), vec!["Idle:enter"]);
    }

    #[test]
    fn change_state_exits_before_entering() {
        let log = Log::default();
        let (mut machine, sink) = machine(&log);
        machine.run(Mode::Idle).unwrap();

        let outcome = machine.change_state(Mode::Patrol).unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::Changed {
                from: Mode::Idle,
                to: Mode::Patrol
            }
        );
        assert_eq!(entries(&log), vec!["Idle:enter", "Idle:exit", "Patrol:enter"]);
        assert_eq!(machine.previous_state_id(), Some(&Mode::Idle));
        assert_eq!(
            sink.transitions(),
            vec![("Idle".to_string(), "Patrol".to_string())]
        );
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn self_transition_exits_and_reenters() {
        let log = Log::default();
        let (mut machine, _) = machine(&log);
        machine.run(Mode::Idle).unwrap();

        machine.change_state(Mode::Idle).unwrap();

        assert_eq!(entries(&log), vec!["Idle:enter", "Idle:exit", "Idle:enter"]);
    }

    #[test]
    fn missing_target_leaves_machine_unchanged() {
        let log = Log::default();
        let (mut machine, sink) = machine(&log);
        machine.run(Mode::Idle).unwrap();

        let outcome = machine.change_state(Mode::Attack).unwrap();

        assert_eq!(
            outcome,
            TransitionOutcome::Missing {
                requested: Mode::Attack
            }
        );
        assert!(!outcome.is_changed());
        assert_eq!(machine.current_state_id(), Some(&Mode::Idle));
        assert_eq!(entries(&log), vec!["Idle:enter"]);
        assert_eq!(
            sink.errors(),
            vec![DiagnosticEvent::MissingState {
                state: "Attack".to_string()
            }]
        );
    }

    #[test]
    fn change_state_before_run_fails() {
        let log = Log::default();
        let (mut machine, _) = machine(&log);

        assert_eq!(machine.change_state(Mode::Patrol), Err(FsmError::NotRunning));
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn update_ticks_current_state_only() {
        let log = Log::default();
        let (mut machine, _) = machine(&log);

        machine.update();
        assert!(entries(&log).is_empty());

        machine.run(Mode::Patrol).unwrap();
        machine.update();
        machine.update();

        assert_eq!(
            entries(&log),
            vec!["Patrol:enter", "Patrol:update", "Patrol:update"]
        );
    }

    #[test]
    fn names_are_empty_before_run() {
        let log = Log::default();
        let (mut machine, _) = machine(&log);
        assert_eq!(machine.current_state_name(), "");
        assert_eq!(machine.previous_state_name(), "");

        machine.run(Mode::Idle).unwrap();
        machine.change_state(Mode::Patrol).unwrap();
        assert_eq!(machine.current_state_name(), "Patrol");
        assert_eq!(machine.previous_state_name(), "Idle");
    }

    #[test]
    fn empty_string_ids_are_invalid() {
        struct Empty;
        impl StateNode<String> for Empty {}

        let mut machine: StateMachine<String> = StateMachine::new(());
        assert!(matches!(
            machine.add_state("", Empty),
            Err(FsmError::InvalidArgument(_))
        ));
        assert!(matches!(machine.run(""), Err(FsmError::InvalidArgument(_))));
        assert!(matches!(
            machine.change_state(""),
            Err(FsmError::InvalidArgument(_))
        ));
        assert_eq!(machine.state_count(), 0);
    }

    #[test]
    fn string_ids_can_be_queried_by_str() {
        struct Empty;
        impl StateNode<String> for Empty {}

        let mut machine: StateMachine<String> = StateMachine::new(());
        machine.add_state("Menu", Empty).unwrap();

        assert!(machine.contains_state("Menu"));
        assert!(!machine.contains_state("Game"));
        assert_eq!(machine.state_ids().count(), 1);
    }

    #[test]
    fn factory_runs_only_for_new_ids() {
        let log = Log::default();
        let (mut machine, sink) = machine(&log);
        let mut calls = 0;

        let result = machine.add_state_with(Mode::Idle, || {
            calls += 1;
            Tracker::new("Other", &log)
        });

        assert_eq!(result, Ok(Registration::Duplicate));
        assert_eq!(calls, 0);
        assert_eq!(sink.error_count(), 1);

        let result = machine.add_state_with(Mode::Attack, || {
            calls += 1;
            Tracker::new("Attack", &log)
        });
        assert_eq!(result, Ok(Registration::Added));
        assert_eq!(calls, 1);
        assert_eq!(entries(&log), vec!["Attack:create"]);
    }

    #[test]
    fn debug_lists_current_state() {
        let log = Log::default();
        let (mut machine, _) = machine(&log);
        machine.run(Mode::Idle).unwrap();

        let rendered = format!("{machine:?}");
        assert!(rendered.contains("current: Some(Idle)"));
    }
}
