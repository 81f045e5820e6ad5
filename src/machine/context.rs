//! What a state sees while one of its hooks runs.

use crate::blackboard::{Blackboard, BlackboardError};
use crate::core::StateId;
use std::any::Any;

/// Handle passed to every [`StateNode`](crate::core::StateNode) hook.
///
/// This is the state's view of its owning machine: read access to the owner,
/// full access to the blackboard, and the ability to request a transition.
///
/// Transition requests are deferred. The machine applies the most recent
/// request once the hook returns, so a hook never observes a half-finished
/// transition.
pub struct StateContext<'a, K: StateId, O = ()> {
    owner: &'a O,
    blackboard: &'a mut Blackboard,
    state: &'a K,
    current: Option<&'a K>,
    previous: Option<&'a K>,
    pending: &'a mut Option<K>,
}

impl<'a, K: StateId, O> StateContext<'a, K, O> {
    pub(crate) fn new(
        owner: &'a O,
        blackboard: &'a mut Blackboard,
        state: &'a K,
        current: Option<&'a K>,
        previous: Option<&'a K>,
        pending: &'a mut Option<K>,
    ) -> Self {
        Self {
            owner,
            blackboard,
            state,
            current,
            previous,
            pending,
        }
    }

    /// The entity the machine runs on behalf of.
    pub fn owner(&self) -> &'a O {
        self.owner
    }

    /// Id of the state whose hook is running.
    pub fn state_id(&self) -> &K {
        self.state
    }

    pub fn current_state_id(&self) -> Option<&K> {
        self.current
    }

    pub fn previous_state_id(&self) -> Option<&K> {
        self.previous
    }

    pub fn blackboard(&self) -> &Blackboard {
        &*self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut *self.blackboard
    }

    /// Shorthand for `blackboard_mut().set(key, value)`.
    pub fn set_blackboard_value<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.blackboard.set(key, value);
    }

    /// Shorthand for `blackboard().get::<T>(key)`.
    pub fn blackboard_value<T: Any>(&self, key: &str) -> Result<Option<&T>, BlackboardError> {
        self.blackboard.get::<T>(key)
    }

    /// Request a transition to `target` once this hook returns.
    ///
    /// A later request in the same hook replaces an earlier one.
    pub fn change_state(&mut self, target: impl Into<K>) {
        *self.pending = Some(target.into());
    }

    /// The transition requested so far, if any.
    pub fn pending_change(&self) -> Option<&K> {
        self.pending.as_ref()
    }

    /// Withdraw a request made earlier in this hook.
    pub fn cancel_change(&mut self) -> Option<K> {
        self.pending.take()
    }
}
