//! # Reinforcement Learning Agents
//!
//! Two value-based agents sharing one driver-facing contract:
//!
//! - **DqnAgent**: deep Q-learning over continuous observations, with
//!   experience replay, a periodically synced target network, and
//!   epsilon-greedy exploration.
//! - **TabularQLearningAgent**: a sparse action-value table over
//!   discretized states, for environments with small discrete state spaces.
//!
//! Both agents are driven by the same synchronous loop: the driver calls
//! [`Agent::act`] to pick an action, applies it to the environment, and
//! feeds the outcome back through [`Agent::observe`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use palaestra::agent::DqnAgentBuilder;
//! use ndarray::array;
//!
//! let mut agent = DqnAgentBuilder::new()
//!     .input_size(4)
//!     .hidden_size(128)
//!     .output_size(2)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let state = array![0.1, -0.2, 0.3, -0.1];
//! let action = agent.act(state.view()).unwrap();
//! assert!(action < 2);
//! ```

use ndarray::{Array1, ArrayView1};

use crate::error::Result;

mod dqn;
mod tabular;

pub use dqn::{DqnAgent, DqnAgentBuilder, DqnModel};
pub use tabular::{QLearningModel, QTableStats, TabularQLearningAgent};

/// Contract between the driver loop and an agent.
pub trait Agent {
    /// Select an action for the given observation.
    fn act(&mut self, state: ArrayView1<f64>) -> Result<usize>;

    /// Feed one environment step back into the agent, letting it learn.
    fn observe(
        &mut self,
        state: ArrayView1<f64>,
        action: usize,
        reward: f64,
        next_state: ArrayView1<f64>,
        done: bool,
    ) -> Result<()>;
}

/// Index of the greatest value, breaking ties toward the lowest index.
pub(crate) fn argmax(values: &Array1<f64>) -> usize {
    let mut best = 0;
    for (idx, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = idx;
        }
    }
    best
}
