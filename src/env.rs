//! The contract both agents consume.
//!
//! An environment owns its internal dynamics and (if any) its own RNG
//! stream, so that a fixed seed makes an episode reproducible. The driver
//! loop is synchronous: `reset`, then repeated `act`/`step`/`observe` until
//! an episode terminates.

use ndarray::Array1;
use std::collections::HashMap;

use crate::error::Result;

/// Auxiliary key/value details attached to a step outcome (collision flags,
/// landing classification, ...). Empty for most steps.
pub type StepInfo = HashMap<String, String>;

/// Outcome of applying one action.
#[derive(Clone, Debug)]
pub struct Step {
    /// Observation after the transition.
    pub state: Array1<f64>,
    pub reward: f64,
    /// Whether the episode has terminated.
    pub done: bool,
    pub info: StepInfo,
}

impl Step {
    pub fn new(state: Array1<f64>, reward: f64, done: bool) -> Self {
        Step {
            state,
            reward,
            done,
            info: StepInfo::new(),
        }
    }

    pub fn with_info(mut self, key: &str, value: &str) -> Self {
        self.info.insert(key.to_string(), value.to_string());
        self
    }
}

/// A simulated environment advanced one discrete action at a time.
pub trait Environment {
    /// Reinitialize the internal state (with environment-specific
    /// randomized perturbation) and return the initial observation.
    fn reset(&mut self) -> Array1<f64>;

    /// Apply one action and advance the dynamics by one fixed time
    /// increment. Out-of-range actions are an error.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Length of the observation vector.
    fn observation_len(&self) -> usize;

    /// Number of discrete actions.
    fn num_actions(&self) -> usize;
}
