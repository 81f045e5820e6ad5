//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for a [`StateMachine`](crate::machine::StateMachine).
///
/// Every field has a default, so partial configs deserialize cleanly:
///
/// ```rust
/// use tickstate::config::MachineConfig;
///
/// let config = MachineConfig::default();
/// assert_eq!(config.node_capacity, 100);
/// assert_eq!(config.blackboard_capacity, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Initial capacity of the state registry
    pub node_capacity: usize,

    /// Initial capacity of the blackboard
    pub blackboard_capacity: usize,

    /// Number of transitions kept in the history (0 disables it)
    pub history_limit: usize,

    /// Transitions a single call may chain through hook requests
    pub max_chained_transitions: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            node_capacity: 100,
            blackboard_capacity: 100,
            history_limit: 64,
            max_chained_transitions: 16,
        }
    }
}

impl MachineConfig {
    pub fn with_capacity(node_capacity: usize, blackboard_capacity: usize) -> Self {
        Self {
            node_capacity,
            blackboard_capacity,
            ..Self::default()
        }
    }
}
