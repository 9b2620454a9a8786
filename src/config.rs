//! Hyperparameter configuration for both agents.
//!
//! Defaults mirror the values the interactive driver starts from. Every
//! field can be overridden before constructing an agent; the builders
//! validate ranges at construction time.

use serde::{Deserialize, Serialize};

/// Hyperparameters for [`DqnAgent`](crate::agent::DqnAgent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqnConfig {
    /// Step size for the SGD update applied after each batch backward pass.
    pub learning_rate: f64,

    /// Discount factor for bootstrapped targets, in (0, 1).
    pub gamma: f64,

    /// Initial exploration probability.
    pub epsilon: f64,

    /// Lower bound the exploration probability never decays below.
    pub epsilon_min: f64,

    /// Multiplicative decay applied to epsilon per training step, in (0, 1).
    pub epsilon_decay: f64,

    /// Number of transitions sampled per training step.
    pub batch_size: usize,

    /// Training is a no-op until the replay memory holds this many transitions.
    pub min_memory_size: usize,

    /// Hard-copy the target parameters every this many training steps.
    pub update_target_freq: usize,

    /// Epsilon does not decay until this many training steps have completed.
    pub warm_up_steps: usize,

    /// Optional multiplicative scaling applied to rewards before storage.
    pub reward_scale: Option<f64>,

    /// Symmetric clamp bound applied to every gradient component.
    pub gradient_clip: f64,

    /// Capacity of the replay memory.
    pub memory_capacity: usize,
}

impl Default for DqnConfig {
    fn default() -> Self {
        DqnConfig {
            learning_rate: 0.001,
            gamma: 0.95,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            batch_size: 32,
            min_memory_size: 32,
            update_target_freq: 100,
            warm_up_steps: 100,
            reward_scale: None,
            gradient_clip: 1.0,
            memory_capacity: 10_000,
        }
    }
}

/// Hyperparameters for [`TabularQLearningAgent`](crate::agent::TabularQLearningAgent).
///
/// Unlike the DQN configuration there is no warm-up: the tabular agent
/// decays epsilon from its very first update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularConfig {
    /// Step size for the TD(0) update.
    pub learning_rate: f64,

    /// Discount factor for bootstrapped targets, in (0, 1).
    pub gamma: f64,

    /// Initial exploration probability.
    pub epsilon: f64,

    /// Multiplicative decay applied to epsilon on every update, in (0, 1).
    pub epsilon_decay: f64,

    /// Lower bound the exploration probability never decays below.
    pub epsilon_min: f64,
}

impl Default for TabularConfig {
    fn default() -> Self {
        TabularConfig {
            learning_rate: 0.1,
            gamma: 0.9,
            epsilon: 0.9,
            epsilon_decay: 0.995,
            epsilon_min: 0.01,
        }
    }
}
